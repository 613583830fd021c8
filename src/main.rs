//! Hatha Coach: Webカメラのヨガポーズをリアルタイム採点するアプリ
//!
//! フレームごとに キャプチャ -> MoveNet -> 分類 -> 関節角採点 -> 移動平均
//! -> オーバーレイ描画 を同期的に実行する。フレームの先行処理や
//! キューイングは行わない

use anyhow::Result;
use std::time::Instant;

use hatha_coach::camera::OpenCvCamera;
use hatha_coach::classify::{classify, Classification, PoseClassifier, UNCERTAIN_TEXT};
use hatha_coach::config::Config;
use hatha_coach::pose::{preprocess_for_movenet, unletterbox_pose, PoseDetector};
use hatha_coach::render::{overlay, MinifbRenderer};
use hatha_coach::scoring::{extract_angles, score, ReferenceLibrary, ScoreSmoother};

const CONFIG_PATH: &str = "config.toml";

fn main() -> Result<()> {
    println!("Hatha Coach {}", env!("GIT_VERSION"));
    println!("Press ESC to exit");

    let config = Config::load_or_default(CONFIG_PATH);

    println!("Opening camera {}...", config.camera.index);
    let mut camera = OpenCvCamera::from_config(&config.camera)?;
    let (width, height) = camera.resolution();
    println!("Camera resolution: {}x{}", width, height);

    println!("Loading MoveNet from {}...", config.model.movenet);
    let mut detector = PoseDetector::new(&config.model.movenet)?;

    println!("Loading classifier from {}...", config.model.classifier);
    let mut classifier = PoseClassifier::new(&config.model.classifier, &config.model.scaler)?;

    let library = ReferenceLibrary::load(&config.scoring.reference_poses)?;
    let mut smoother = ScoreSmoother::new(config.scoring.window_size);

    let mut renderer = MinifbRenderer::new("Hatha Coach", width as usize, height as usize)?;

    // FPS計測用
    let mut frame_count = 0u32;
    let mut fps_timer = Instant::now();

    // メインループ（フレーム同期）
    while renderer.is_open() {
        // フレームを取得
        let mut frame = match camera.read_frame() {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Frame capture error: {}", e);
                continue;
            }
        };

        // 前処理と推論。検出結果は元フレーム基準の座標に戻す
        let (input, letterbox) = preprocess_for_movenet(&frame)?;
        let pose = unletterbox_pose(&detector.detect(input)?, &letterbox);

        // 分類と採点。不確かなフレームは採点せず、ウィンドウも更新しない
        let probs = classifier.predict(&pose)?;
        match classify(&probs, config.scoring.confidence_threshold) {
            Classification::Confident { variant, label } => {
                let angles = extract_angles(&pose);
                let deviation = score(&angles, library.get(variant));
                smoother.push(&deviation);
                overlay::draw_label(&mut frame, label.as_str())?;
            }
            Classification::Uncertain => {
                overlay::draw_label(&mut frame, UNCERTAIN_TEXT)?;
            }
        }

        // 平滑化済みスコアとバーを描画（初回の有効フレームまでは非表示）
        if let Some(smoothed) = smoother.average() {
            overlay::draw_score(&mut frame, 1.0 - smoothed.average)?;
            overlay::draw_deviation_bars(&mut frame, &smoothed.per_joint)?;
        }

        // 表示
        renderer.draw_frame(&frame)?;
        renderer.draw_pose(&pose, config.scoring.keypoint_threshold);
        renderer.update()?;

        // FPS計算
        frame_count += 1;
        let elapsed = fps_timer.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            let fps = frame_count as f32 / elapsed;
            println!(
                "FPS: {:.1}, Avg confidence: {:.2}, Window: {}",
                fps,
                pose.average_confidence(),
                smoother.len()
            );
            frame_count = 0;
            fps_timer = Instant::now();
        }
    }

    println!("Shutting down...");
    Ok(())
}
