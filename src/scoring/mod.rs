pub mod angles;
pub mod deviation;
pub mod reference;
pub mod smoother;

pub use angles::{extract_angles, joint_angle, Joint, JointAngles, FALLBACK_ANGLE_DEG};
pub use deviation::{score, Deviation, ANGLE_SPAN_DEG};
pub use reference::ReferenceLibrary;
pub use smoother::ScoreSmoother;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify, Classification, PoseLabel};
    use crate::pose::{Keypoint, Pose};

    /// 全キーポイントがばらけた合成姿勢
    fn synthetic_pose() -> Pose {
        let mut pose = Pose::default();
        for (i, kp) in pose.keypoints.iter_mut().enumerate() {
            let x = 0.15 + 0.042 * i as f32;
            let y = 0.85 - 0.037 * i as f32;
            *kp = Keypoint::new(x, y, 1.0);
        }
        pose
    }

    /// variant 0 の参照角度を指定し、残りを90度で埋めたライブラリ
    fn library_with_variant0(angles: &JointAngles) -> ReferenceLibrary {
        let labels = [
            "Downdog", "Goddess", "Plank", "Plank", "Tree", "Tree", "Warrior", "Warrior",
        ];
        // f32 の最短往復表現で書き出すので参照角は計測角と厳密一致する
        let fmt = |a: &JointAngles| {
            let list: Vec<String> = a.iter().map(|v| format!("{}", v)).collect();
            format!("[{}]", list.join(", "))
        };
        let mut toml = String::from("version = 1\n\n");
        for (i, label) in labels.iter().enumerate() {
            let body = if i == 0 {
                fmt(angles)
            } else {
                String::from("[90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0]")
            };
            toml.push_str(&format!(
                "[[pose]]\nvariant = {}\nlabel = \"{}\"\nangles = {}\n\n",
                i, label, body
            ));
        }
        ReferenceLibrary::from_str(&toml).unwrap()
    }

    #[test]
    fn test_pipeline_perfect_pose_scores_zero() {
        // 参照と完全一致する姿勢 + 確率1.0の分類 -> 偏差0がウィンドウ越しでも維持される
        let pose = synthetic_pose();
        let measured = extract_angles(&pose);
        let library = library_with_variant0(&measured);

        let mut probs = [0.0f32; 8];
        probs[0] = 1.0;
        let classification = classify(&probs, 0.8);
        let variant = match classification {
            Classification::Confident { variant, label } => {
                assert_eq!(label, PoseLabel::Downdog);
                variant
            }
            Classification::Uncertain => panic!("expected confident classification"),
        };

        let mut smoother = ScoreSmoother::new(40);
        let dev = score(&measured, library.get(variant));
        smoother.push(&dev);
        assert_eq!(smoother.average().unwrap().average, 0.0);

        for _ in 0..39 {
            smoother.push(&score(&measured, library.get(variant)));
        }
        let avg = smoother.average().unwrap();
        assert_eq!(avg.average, 0.0);
        assert_eq!(avg.per_joint, [0.0; Joint::COUNT]);
    }

    #[test]
    fn test_pipeline_uncertain_frame_preserves_window() {
        let pose = synthetic_pose();
        let measured = extract_angles(&pose);
        let library = library_with_variant0(&measured);

        let mut smoother = ScoreSmoother::new(40);
        smoother.push(&score(&measured, library.get(0)));
        let before = smoother.average().unwrap();

        // 確信度0.5 -> 不確か。採点もウィンドウ更新も行わない
        let mut probs = [0.5f32 / 7.0; 8];
        probs[0] = 0.5;
        assert_eq!(classify(&probs, 0.8), Classification::Uncertain);

        assert_eq!(smoother.len(), 1);
        assert_eq!(smoother.average().unwrap(), before);
    }
}
