use anyhow::{bail, Context, Result};
use ndarray::Array4;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;

use super::keypoint::{KeypointIndex, Pose};

/// MoveNet を使用した姿勢検出器
pub struct PoseDetector {
    session: Session,
}

impl PoseDetector {
    /// ONNXモデルを読み込んで初期化
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(model_path.as_ref())
            .context("Failed to load MoveNet ONNX model")?;

        Ok(Self { session })
    }

    /// 前処理済みテンソルから姿勢を検出
    ///
    /// 入力: [1, 192, 192, 3] の f32 テンソル
    /// 出力: Pose (17キーポイント)
    pub fn detect(&mut self, input: Array4<f32>) -> Result<Pose> {
        let input_tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs!["serving_default_input_0" => input_tensor])
            .context("MoveNet inference failed")?;

        // MoveNet の出力は [1, 1, 17, 3] (y, x, confidence)
        let output: ndarray::ArrayViewD<f32> = outputs["StatefulPartitionedCall_0"]
            .try_extract_array()
            .context("Failed to extract MoveNet output tensor")?;

        if output.len() != KeypointIndex::COUNT * 3 {
            bail!(
                "Unexpected MoveNet output shape {:?} (expected {} values)",
                output.shape(),
                KeypointIndex::COUNT * 3
            );
        }

        let mut values = [0.0f32; KeypointIndex::COUNT * 3];
        for i in 0..KeypointIndex::COUNT {
            values[i * 3] = output[[0, 0, i, 0]];
            values[i * 3 + 1] = output[[0, 0, i, 1]];
            values[i * 3 + 2] = output[[0, 0, i, 2]];
        }

        Pose::from_yxc(&values)
    }
}
