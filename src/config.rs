use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CameraConfig {
    /// カメラデバイスのインデックス
    #[serde(default)]
    pub index: i32,
    /// キャプチャ幅
    #[serde(default = "default_camera_width")]
    pub width: u32,
    /// キャプチャ高さ
    #[serde(default = "default_camera_height")]
    pub height: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// MoveNetモデルのパス
    #[serde(default = "default_movenet_path")]
    pub movenet: String,
    /// ポーズ分類器モデルのパス
    #[serde(default = "default_classifier_path")]
    pub classifier: String,
    /// 分類器スケーラーデータのパス
    #[serde(default = "default_scaler_path")]
    pub scaler: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScoringConfig {
    /// 参照ポーズデータのパス
    #[serde(default = "default_reference_path")]
    pub reference_poses: String,
    /// 分類の信頼度閾値。argmax がこれ未満なら不確か扱い
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
    /// キーポイント描画の信頼度閾値
    #[serde(default = "default_keypoint_threshold")]
    pub keypoint_threshold: f32,
    /// 移動平均ウィンドウのフレーム数
    #[serde(default = "default_window_size")]
    pub window_size: usize,
}

fn default_camera_width() -> u32 { 640 }
fn default_camera_height() -> u32 { 480 }
fn default_movenet_path() -> String { "models/movenet_lightning.onnx".to_string() }
fn default_classifier_path() -> String { "models/pose_classifier.onnx".to_string() }
fn default_scaler_path() -> String { "data/scaler.toml".to_string() }
fn default_reference_path() -> String { "data/reference_poses.toml".to_string() }
fn default_confidence_threshold() -> f32 { crate::classify::gate::DEFAULT_CONFIDENCE_THRESHOLD }
fn default_keypoint_threshold() -> f32 { 0.4 }
fn default_window_size() -> usize { 40 }

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            width: default_camera_width(),
            height: default_camera_height(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            movenet: default_movenet_path(),
            classifier: default_classifier_path(),
            scaler: default_scaler_path(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            reference_poses: default_reference_path(),
            confidence_threshold: default_confidence_threshold(),
            keypoint_threshold: default_keypoint_threshold(),
            window_size: default_window_size(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config from {}", path.as_ref().display()))?;
        let config: Config = toml::from_str(&content).context("Failed to parse config")?;
        Ok(config)
    }

    /// 設定ファイルがなければデフォルトで起動
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Config not loaded ({}), using defaults", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.camera.index, 0);
        assert_eq!(config.camera.width, 640);
        assert_eq!(config.scoring.confidence_threshold, 0.8);
        assert_eq!(config.scoring.window_size, 40);
    }

    #[test]
    fn test_partial_override() {
        let toml = "[scoring]\nwindow_size = 10\n";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.scoring.window_size, 10);
        // 他のフィールドはデフォルトのまま
        assert_eq!(config.scoring.confidence_threshold, 0.8);
        assert_eq!(config.model.movenet, "models/movenet_lightning.onnx");
    }
}
