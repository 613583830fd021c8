use super::angles::{Joint, JointAngles};

/// 正規化基準（度）
///
/// 平面角は [0, 180] なので取りうる最大差は 180 度。全関節で同一の基準を
/// 使うことで関節間のバー長を比較可能にする
pub const ANGLE_SPAN_DEG: f32 = 180.0;

/// 1フレーム分の偏差
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deviation {
    /// 関節ごとの正規化偏差 [0, 1]。インデックスは Joint と同順
    pub per_joint: [f32; Joint::COUNT],
    /// 8関節の平均偏差 [0, 1]
    pub average: f32,
}

/// 計測角と参照角の偏差を計算
///
/// 関節ごとに |measured - reference| / ANGLE_SPAN_DEG を取り、表示破綻を
/// 防ぐため [0, 1] にクランプする。絶対差なので引数順に対して対称
pub fn score(measured: &JointAngles, reference: &JointAngles) -> Deviation {
    let mut per_joint = [0.0f32; Joint::COUNT];
    let mut sum = 0.0f32;

    for i in 0..Joint::COUNT {
        let diff = ((measured[i] - reference[i]).abs() / ANGLE_SPAN_DEG).clamp(0.0, 1.0);
        per_joint[i] = diff;
        sum += diff;
    }

    Deviation {
        per_joint,
        average: sum / Joint::COUNT as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_pose_scores_zero() {
        let angles = [135.0, 90.0, 45.0, 180.0, 0.0, 60.0, 120.0, 30.0];
        let dev = score(&angles, &angles);
        assert_eq!(dev.per_joint, [0.0; Joint::COUNT]);
        assert_eq!(dev.average, 0.0);
    }

    #[test]
    fn test_symmetric() {
        let a = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0];
        let b = [170.0, 20.0, 90.0, 45.0, 0.0, 60.0, 180.0, 100.0];
        assert_eq!(score(&a, &b), score(&b, &a));
    }

    #[test]
    fn test_normalization_basis() {
        let mut a = [0.0f32; Joint::COUNT];
        let b = [0.0f32; Joint::COUNT];
        a[0] = 90.0;
        let dev = score(&a, &b);
        assert!((dev.per_joint[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_clamped_to_unit_range() {
        // 不正な入力角でもバー長は [0, 1] を超えない
        let a = [400.0f32; Joint::COUNT];
        let b = [0.0f32; Joint::COUNT];
        let dev = score(&a, &b);
        for d in dev.per_joint {
            assert_eq!(d, 1.0);
        }
        assert_eq!(dev.average, 1.0);
    }

    #[test]
    fn test_average_is_mean_of_joints() {
        let a = [180.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let b = [0.0f32; Joint::COUNT];
        let dev = score(&a, &b);
        assert!((dev.average - 1.0 / 8.0).abs() < 1e-6);
    }
}
