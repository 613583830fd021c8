use anyhow::{bail, Context, Result};
use ndarray::Array2;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::gate::VARIANT_COUNT;
use crate::pose::{KeypointIndex, Pose};

/// 分類器への特徴量数: 17キーポイント × (y, x)
pub const FEATURE_COUNT: usize = KeypointIndex::COUNT * 2;

/// 分類器モデルの入出力テンソル名
const INPUT_NAME: &str = "input";
const OUTPUT_NAME: &str = "output";

/// 姿勢を分類器の特徴量ベクトルに変換
///
/// キーポイントごとに (y, x) の順でフラット化する。信頼度チャネルは
/// 分類には使わないためここで落とす
pub fn pose_features(pose: &Pose) -> [f32; FEATURE_COUNT] {
    let mut features = [0.0f32; FEATURE_COUNT];
    for (i, kp) in pose.keypoints.iter().enumerate() {
        features[i * 2] = kp.y;
        features[i * 2 + 1] = kp.x;
    }
    features
}

/// 特徴量の標準化パラメータ（学習時スケーラーの mean / scale）
#[derive(Debug, Deserialize)]
pub struct FeatureScaler {
    mean: Vec<f32>,
    scale: Vec<f32>,
}

impl FeatureScaler {
    /// TOMLファイルから読み込み
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read scaler data from {}", path.as_ref().display()))?;
        Self::from_str(&content)
    }

    /// TOML文字列から構築。長さ不一致・ゼロ除算になる scale は起動時に弾く
    pub fn from_str(content: &str) -> Result<Self> {
        let scaler: FeatureScaler =
            toml::from_str(content).context("Failed to parse scaler data")?;

        if scaler.mean.len() != FEATURE_COUNT || scaler.scale.len() != FEATURE_COUNT {
            bail!(
                "Scaler expects {} values, got mean={} scale={}",
                FEATURE_COUNT,
                scaler.mean.len(),
                scaler.scale.len()
            );
        }
        if scaler.scale.iter().any(|&s| s == 0.0 || !s.is_finite()) {
            bail!("Scaler contains zero or non-finite scale values");
        }

        Ok(scaler)
    }

    /// (v - mean) / scale
    pub fn transform(&self, features: &[f32; FEATURE_COUNT]) -> [f32; FEATURE_COUNT] {
        let mut scaled = [0.0f32; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            scaled[i] = (features[i] - self.mean[i]) / self.scale[i];
        }
        scaled
    }
}

/// キーポイント特徴量からヨガポーズを分類するNN
pub struct PoseClassifier {
    session: Session,
    scaler: FeatureScaler,
}

impl PoseClassifier {
    /// ONNXモデルとスケーラーデータを読み込んで初期化
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(model_path: P, scaler_path: Q) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(model_path.as_ref())
            .context("Failed to load classifier ONNX model")?;
        let scaler = FeatureScaler::load(scaler_path)?;

        Ok(Self { session, scaler })
    }

    /// 姿勢から8バリアントのsoftmax出力を得る
    pub fn predict(&mut self, pose: &Pose) -> Result<[f32; VARIANT_COUNT]> {
        let features = self.scaler.transform(&pose_features(pose));

        let input = Array2::from_shape_vec((1, FEATURE_COUNT), features.to_vec())?;
        let input_tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs![INPUT_NAME => input_tensor])
            .context("Classifier inference failed")?;

        let output: ndarray::ArrayViewD<f32> = outputs[OUTPUT_NAME]
            .try_extract_array()
            .context("Failed to extract classifier output tensor")?;

        if output.len() != VARIANT_COUNT {
            bail!(
                "Unexpected classifier output shape {:?} (expected {} values)",
                output.shape(),
                VARIANT_COUNT
            );
        }

        let mut probs = [0.0f32; VARIANT_COUNT];
        for (i, &p) in output.iter().enumerate() {
            probs[i] = p;
        }
        Ok(probs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Keypoint;

    fn scaler_toml(mean: f32, scale: f32) -> String {
        let values = |v: f32| {
            let list: Vec<String> = (0..FEATURE_COUNT).map(|_| format!("{:.1}", v)).collect();
            format!("[{}]", list.join(", "))
        };
        format!("mean = {}\nscale = {}\n", values(mean), values(scale))
    }

    #[test]
    fn test_pose_features_layout() {
        let mut pose = Pose::default();
        pose.keypoints[0] = Keypoint::new(0.5, 0.3, 0.9);
        pose.keypoints[16] = Keypoint::new(0.1, 0.8, 0.2);

        let features = pose_features(&pose);
        assert_eq!(features.len(), 34);
        // (y, x) 順、信頼度は落とす
        assert_eq!(features[0], 0.3);
        assert_eq!(features[1], 0.5);
        assert_eq!(features[32], 0.8);
        assert_eq!(features[33], 0.1);
    }

    #[test]
    fn test_scaler_transform() {
        let scaler = FeatureScaler::from_str(&scaler_toml(0.5, 0.2)).unwrap();
        let mut features = [0.5f32; FEATURE_COUNT];
        features[0] = 0.7;
        let scaled = scaler.transform(&features);
        assert!((scaled[0] - 1.0).abs() < 1e-6);
        assert!(scaled[1].abs() < 1e-6);
    }

    #[test]
    fn test_scaler_rejects_wrong_length() {
        let toml = "mean = [0.5, 0.5]\nscale = [0.2, 0.2]\n";
        assert!(FeatureScaler::from_str(toml).is_err());
    }

    #[test]
    fn test_scaler_rejects_zero_scale() {
        let toml = scaler_toml(0.5, 0.2).replace("scale = [0.2", "scale = [0.0");
        assert!(FeatureScaler::from_str(&toml).is_err());
    }

    #[test]
    fn test_shipped_scaler_data_valid() {
        let content = include_str!("../../data/scaler.toml");
        assert!(FeatureScaler::from_str(content).is_ok());
    }
}
