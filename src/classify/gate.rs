/// 分類器が出力するバリアント数
pub const VARIANT_COUNT: usize = 8;

/// 信頼度の既定閾値。argmax の確率がこれ未満なら「不確か」扱い
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.8;

/// 不確かな場合の表示テキスト
pub const UNCERTAIN_TEXT: &str = "...still thinking...";

/// 表示用のポーズラベル（閉じた列挙）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoseLabel {
    Downdog,
    Goddess,
    Plank,
    Tree,
    Warrior,
}

impl PoseLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoseLabel::Downdog => "Downdog",
            PoseLabel::Goddess => "Goddess",
            PoseLabel::Plank => "Plank",
            PoseLabel::Tree => "Tree",
            PoseLabel::Warrior => "Warrior",
        }
    }
}

/// バリアントID -> 表示ラベル
///
/// 複数バリアントが同じラベルを共有する（2/3: Plank の肘つき/腕伸ばし、
/// 4/5: Tree の胸前/頭上、6/7: Warrior の左右）。参照ポーズの選択は
/// ラベルではなくバリアントIDで行うこと
pub const VARIANT_LABELS: [PoseLabel; VARIANT_COUNT] = [
    PoseLabel::Downdog,
    PoseLabel::Goddess,
    PoseLabel::Plank,
    PoseLabel::Plank,
    PoseLabel::Tree,
    PoseLabel::Tree,
    PoseLabel::Warrior,
    PoseLabel::Warrior,
];

/// 分類結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classification {
    /// 信頼できる分類。variant は参照ポーズ選択用のインデックス
    Confident { variant: usize, label: PoseLabel },
    /// 信頼度不足。このフレームの採点はスキップする
    Uncertain,
}

/// softmax出力からポーズを判定
///
/// argmax を取り、その確率が threshold 以上なら Confident。
/// 境界はちょうど threshold の場合を Confident とする（>= 規則）
pub fn classify(probs: &[f32; VARIANT_COUNT], threshold: f32) -> Classification {
    let mut best = 0;
    for i in 1..VARIANT_COUNT {
        if probs[i] > probs[best] {
            best = i;
        }
    }

    if probs[best] >= threshold {
        Classification::Confident {
            variant: best,
            label: VARIANT_LABELS[best],
        }
    } else {
        Classification::Uncertain
    }
}
