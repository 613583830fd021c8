use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::angles::{Joint, JointAngles};
use crate::classify::gate::{PoseLabel, VARIANT_COUNT, VARIANT_LABELS};

/// 参照ポーズデータファイルのフォーマット
#[derive(Debug, Deserialize)]
struct ReferenceFile {
    version: u32,
    #[serde(rename = "pose")]
    poses: Vec<ReferenceEntry>,
}

#[derive(Debug, Deserialize)]
struct ReferenceEntry {
    /// 分類器の出力インデックス (0..=7)
    variant: usize,
    /// 表示ラベル（VARIANT_LABELS との整合性を検証する）
    label: String,
    /// 関節角（度）。Joint と同順で8要素
    angles: Vec<f32>,
}

/// 理想ポーズの関節角ライブラリ
///
/// バリアントID（分類器インデックス）をキーに持つ。同じ表示ラベルでも
/// バリアントごとに参照角度は異なる（例: Tree の胸前/頭上）ため、
/// ラベルではなく必ずIDで引く
#[derive(Debug)]
pub struct ReferenceLibrary {
    poses: [JointAngles; VARIANT_COUNT],
}

impl ReferenceLibrary {
    /// TOMLファイルから読み込み
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read reference poses from {}", path.as_ref().display())
        })?;
        Self::from_str(&content)
    }

    /// TOML文字列から構築
    ///
    /// 起動時検証: 全バリアントが揃っていること、角度が8要素で [0, 180] に
    /// 収まっていること、ラベルがバリアント表と一致していること。
    /// 不正データはここで止める
    pub fn from_str(content: &str) -> Result<Self> {
        let file: ReferenceFile =
            toml::from_str(content).context("Failed to parse reference pose data")?;

        if file.version != 1 {
            bail!("Unsupported reference pose data version: {}", file.version);
        }

        let mut poses = [None::<JointAngles>; VARIANT_COUNT];
        for entry in &file.poses {
            if entry.variant >= VARIANT_COUNT {
                bail!("Reference pose variant {} out of range", entry.variant);
            }
            if poses[entry.variant].is_some() {
                bail!("Duplicate reference pose variant {}", entry.variant);
            }
            if entry.angles.len() != Joint::COUNT {
                bail!(
                    "Reference pose variant {} has {} angles, expected {}",
                    entry.variant,
                    entry.angles.len(),
                    Joint::COUNT
                );
            }
            let expected = VARIANT_LABELS[entry.variant].as_str();
            if entry.label != expected {
                bail!(
                    "Reference pose variant {} labeled \"{}\", expected \"{}\"",
                    entry.variant,
                    entry.label,
                    expected
                );
            }

            let mut angles = [0.0f32; Joint::COUNT];
            for (i, &a) in entry.angles.iter().enumerate() {
                if !(0.0..=180.0).contains(&a) {
                    bail!(
                        "Reference pose variant {} joint {} angle {} out of [0, 180]",
                        entry.variant,
                        i,
                        a
                    );
                }
                angles[i] = a;
            }
            poses[entry.variant] = Some(angles);
        }

        let mut resolved = [[0.0f32; Joint::COUNT]; VARIANT_COUNT];
        for (variant, pose) in poses.iter().enumerate() {
            match pose {
                Some(angles) => resolved[variant] = *angles,
                None => bail!("Missing reference pose for variant {}", variant),
            }
        }

        Ok(Self { poses: resolved })
    }

    /// バリアントIDで参照角度を取得
    pub fn get(&self, variant: usize) -> &JointAngles {
        &self.poses[variant]
    }

    /// バリアントの表示ラベル
    pub fn label(&self, variant: usize) -> PoseLabel {
        VARIANT_LABELS[variant]
    }
}
