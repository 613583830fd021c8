use anyhow::Result;
use ndarray::Array4;
use opencv::{
    core::{Mat, Size, CV_32FC3},
    imgproc,
    prelude::*,
};

use super::keypoint::{Keypoint, Pose};

/// MoveNet用の入力サイズ
pub const MOVENET_INPUT_SIZE: i32 = 192;

/// レターボックス変換の情報（正規化座標）
///
/// MoveNet の出力はパディング込みキャンバス基準の正規化座標で返るため、
/// 元フレーム基準に戻すときに使う
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterboxInfo {
    pub offset_x: f32,
    pub offset_y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl LetterboxInfo {
    /// フレーム寸法からパディング配置を計算
    ///
    /// 戻り値はレターボックス情報と、キャンバス内に収まる実画像の
    /// ピクセル寸法。パディングは上下または左右に均等配置
    pub fn compute(width: i32, height: i32) -> (Self, i32, i32) {
        let side = MOVENET_INPUT_SIZE;
        let (content_w, content_h) = if width >= height {
            let h = ((height as f32 / width as f32) * side as f32).round() as i32;
            (side, h.clamp(1, side))
        } else {
            let w = ((width as f32 / height as f32) * side as f32).round() as i32;
            (w.clamp(1, side), side)
        };
        let pad_x = (side - content_w) / 2;
        let pad_y = (side - content_h) / 2;

        let info = Self {
            offset_x: pad_x as f32 / side as f32,
            offset_y: pad_y as f32 / side as f32,
            scale_x: content_w as f32 / side as f32,
            scale_y: content_h as f32 / side as f32,
        };
        (info, content_w, content_h)
    }
}

/// キャンバス基準の姿勢を元フレーム基準の正規化座標に戻す
///
/// 両軸を同率で戻すので、元フレームのアスペクト比によらず
/// キーポイント間の幾何（関節角）は保存される
pub fn unletterbox_pose(pose: &Pose, info: &LetterboxInfo) -> Pose {
    let mut result = pose.clone();
    for kp in result.keypoints.iter_mut() {
        *kp = Keypoint::new(
            (kp.x - info.offset_x) / info.scale_x,
            (kp.y - info.offset_y) / info.scale_y,
            kp.confidence,
        );
    }
    result
}

/// OpenCV Mat を MoveNet用の入力テンソルに変換
///
/// - BGR -> RGB
/// - アスペクト比を保って 192x192 にレターボックス（余白は黒）
/// - [1, 192, 192, 3] の f32 テンソルに変換 (0.0-255.0)
///
/// 単純な引き伸ばしだと非正方フレームでキーポイント幾何が歪み、
/// 固定の参照角度と比較できなくなる。検出結果は unletterbox_pose で
/// 元フレーム基準に戻すこと
pub fn preprocess_for_movenet(frame: &Mat) -> Result<(Array4<f32>, LetterboxInfo)> {
    let (info, content_w, content_h) = LetterboxInfo::compute(frame.cols(), frame.rows());
    let pad_x = (MOVENET_INPUT_SIZE - content_w) / 2;
    let pad_y = (MOVENET_INPUT_SIZE - content_h) / 2;

    // BGR -> RGB
    let mut rgb = Mat::default();
    imgproc::cvt_color(frame, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;

    // アスペクト比を保ってリサイズ
    let mut resized = Mat::default();
    imgproc::resize(
        &rgb,
        &mut resized,
        Size::new(content_w, content_h),
        0.0,
        0.0,
        imgproc::INTER_LINEAR,
    )?;

    // f32 に変換
    let mut float_mat = Mat::default();
    resized.convert_to(&mut float_mat, CV_32FC3, 1.0, 0.0)?;

    // パディング位置へ書き込み [1, 192, 192, 3]。余白はゼロのまま
    let side = MOVENET_INPUT_SIZE as usize;
    let mut tensor = Array4::<f32>::zeros((1, side, side, 3));

    for y in 0..content_h {
        for x in 0..content_w {
            let pixel = float_mat.at_2d::<opencv::core::Vec3f>(y, x)?;
            let ty = (y + pad_y) as usize;
            let tx = (x + pad_x) as usize;
            tensor[[0, ty, tx, 0]] = pixel[0];
            tensor[[0, ty, tx, 1]] = pixel[1];
            tensor[[0, ty, tx, 2]] = pixel[2];
        }
    }

    Ok((tensor, info))
}
