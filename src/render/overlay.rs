use anyhow::Result;
use opencv::{
    core::{Mat, Point, Rect, Scalar},
    imgproc,
};

use crate::scoring::Joint;

/// ラベル背景ボックス (x, y, 幅, 高さ)。上端に食い込ませて帯状に見せる
const LABEL_BOX: (i32, i32, i32, i32) = (170, -4, 300, 50);
/// ラベルテキストの基準位置
const LABEL_TEXT_POS: (i32, i32) = (180, 34);
/// スコアテキストの基準位置
const SCORE_TEXT_POS: (i32, i32) = (210, 80);

/// 偏差バーの先頭Y座標
const BAR_START_Y: i32 = 95;
/// バー1本の高さ（ピクセル）
const BAR_HEIGHT: i32 = 28;
/// バー間の隙間（ピクセル）
const BAR_SPACING: i32 = 2;
/// 偏差1.0のときのバー長（ピクセル）
const BAR_FULL_LENGTH: f32 = 100.0;

/// 関節名キャプションの先頭Y座標と行間
const CAPTION_START_Y: i32 = 120;
const CAPTION_LINE_HEIGHT: i32 = 30;

/// ラベル背景の色 (BGR: 緑)
fn label_box_color() -> Scalar {
    Scalar::new(0.0, 255.0, 0.0, 0.0)
}

/// テキストの色 (BGR: 黒)
fn text_color() -> Scalar {
    Scalar::new(0.0, 0.0, 0.0, 0.0)
}

/// 偏差バーの色 (BGR)
fn bar_color() -> Scalar {
    Scalar::new(100.0, 100.0, 255.0, 0.0)
}

fn put_text(frame: &mut Mat, text: &str, pos: (i32, i32)) -> Result<()> {
    imgproc::put_text(
        frame,
        text,
        Point::new(pos.0, pos.1),
        imgproc::FONT_HERSHEY_COMPLEX,
        1.0,
        text_color(),
        2,
        imgproc::LINE_8,
        false,
    )?;
    Ok(())
}

/// ポーズラベル（または「考え中」テキスト）を背景ボックス付きで描画
pub fn draw_label(frame: &mut Mat, text: &str) -> Result<()> {
    let (x, y, w, h) = LABEL_BOX;
    imgproc::rectangle(
        frame,
        Rect::new(x, y, w, h),
        label_box_color(),
        imgproc::FILLED,
        imgproc::LINE_8,
        0,
    )?;
    put_text(frame, text, LABEL_TEXT_POS)
}

/// 総合スコアを描画。score は 1 - 平均偏差（1.0が完全一致）
pub fn draw_score(frame: &mut Mat, score: f32) -> Result<()> {
    put_text(frame, &format!("Score: {:.2}", score), SCORE_TEXT_POS)
}

/// 関節ごとの偏差バーとキャプションを描画
///
/// バー長は偏差に比例（偏差1.0で BAR_FULL_LENGTH ピクセル）。偏差は
/// 採点側で [0, 1] にクランプ済みなのでバーが画面を突き抜けることはない
pub fn draw_deviation_bars(frame: &mut Mat, per_joint: &[f32; Joint::COUNT]) -> Result<()> {
    for (i, &diff) in per_joint.iter().enumerate() {
        let length = (diff * BAR_FULL_LENGTH) as i32;
        let y = BAR_START_Y + (BAR_HEIGHT + BAR_SPACING) * i as i32;
        if length > 0 {
            imgproc::rectangle(
                frame,
                Rect::new(0, y, length, BAR_HEIGHT),
                bar_color(),
                imgproc::FILLED,
                imgproc::LINE_8,
                0,
            )?;
        }
    }

    for joint in Joint::ALL {
        let y = CAPTION_START_Y + CAPTION_LINE_HEIGHT * joint as i32;
        put_text(frame, joint.name(), (0, y))?;
    }

    Ok(())
}
