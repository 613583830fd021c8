use crate::pose::{KeypointIndex, Pose};

/// 採点対象の8関節
///
/// インデックス順は参照ポーズデータおよび表示バーの並びと一致させること
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Joint {
    ElbowL = 0,
    ElbowR = 1,
    ShoulderL = 2,
    ShoulderR = 3,
    HipL = 4,
    HipR = 5,
    KneeL = 6,
    KneeR = 7,
}

impl Joint {
    pub const COUNT: usize = 8;

    pub const ALL: [Joint; Joint::COUNT] = [
        Joint::ElbowL,
        Joint::ElbowR,
        Joint::ShoulderL,
        Joint::ShoulderR,
        Joint::HipL,
        Joint::HipR,
        Joint::KneeL,
        Joint::KneeR,
    ];

    /// 画面表示用の関節名
    pub fn name(&self) -> &'static str {
        match self {
            Joint::ElbowL => "Elbow L",
            Joint::ElbowR => "Elbow R",
            Joint::ShoulderL => "Shoulder L",
            Joint::ShoulderR => "Shoulder R",
            Joint::HipL => "Hip L",
            Joint::HipR => "Hip R",
            Joint::KneeL => "Knee L",
            Joint::KneeR => "Knee R",
        }
    }

    /// 関節角を構成するキーポイント (頂点, 端点, 端点)
    pub fn keypoints(&self) -> (KeypointIndex, KeypointIndex, KeypointIndex) {
        use KeypointIndex::*;
        match self {
            Joint::ElbowL => (LeftElbow, LeftShoulder, LeftWrist),
            Joint::ElbowR => (RightElbow, RightShoulder, RightWrist),
            Joint::ShoulderL => (LeftShoulder, LeftElbow, LeftHip),
            Joint::ShoulderR => (RightShoulder, RightElbow, RightHip),
            Joint::HipL => (LeftHip, LeftShoulder, LeftKnee),
            Joint::HipR => (RightHip, RightShoulder, RightKnee),
            Joint::KneeL => (LeftKnee, LeftHip, LeftAnkle),
            Joint::KneeR => (RightKnee, RightHip, RightAnkle),
        }
    }
}

/// 8関節の角度セット（度、[0, 180]）。インデックスは Joint と同順
pub type JointAngles = [f32; Joint::COUNT];

/// 縮退ベクトル判定の閾値（正規化座標）
const DEGENERATE_EPS: f32 = 1e-6;

/// 縮退時のフォールバック角度（度）
///
/// キーポイントが一致している・信頼度ゼロで原点に張り付いている等で
/// ベクトル長がほぼゼロの場合、角度は定義できない。NaN を流さず 0.0 を返す
pub const FALLBACK_ANGLE_DEG: f32 = 0.0;

/// 頂点 vertex における 2 ベクトル間の平面角を度で返す
///
/// 出力範囲は [0, 180]。縮退時は FALLBACK_ANGLE_DEG
pub fn joint_angle(pose: &Pose, joint: Joint) -> f32 {
    let (vertex, a, b) = joint.keypoints();
    let v = pose.get(vertex);
    let pa = pose.get(a);
    let pb = pose.get(b);

    let ux = pa.x - v.x;
    let uy = pa.y - v.y;
    let wx = pb.x - v.x;
    let wy = pb.y - v.y;

    let lu = (ux * ux + uy * uy).sqrt();
    let lw = (wx * wx + wy * wy).sqrt();
    if lu < DEGENERATE_EPS || lw < DEGENERATE_EPS {
        return FALLBACK_ANGLE_DEG;
    }

    // 丸め誤差で |cos| が 1 を僅かに超えると acos が NaN になる
    let cos = ((ux * wx + uy * wy) / (lu * lw)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// 姿勢から8関節すべての角度を抽出
pub fn extract_angles(pose: &Pose) -> JointAngles {
    let mut angles = [0.0f32; Joint::COUNT];
    for joint in Joint::ALL {
        angles[joint as usize] = joint_angle(pose, joint);
    }
    angles
}
