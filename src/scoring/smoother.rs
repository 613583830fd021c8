use std::collections::VecDeque;

use super::angles::Joint;
use super::deviation::Deviation;

/// 偏差スコアの移動平均ウィンドウ
///
/// 直近 capacity フレーム分の偏差を FIFO で保持し、要素ごとの平均を返す。
/// ウィンドウが埋まるまでの間（ウォームアップ）は保持している分だけで
/// 平均を取る。これは起動直後の仕様上の過渡であってバグではない。
/// 分類が不確かなフレームでは push しないこと（最後の有効な平均が残る）
pub struct ScoreSmoother {
    capacity: usize,
    per_joint: VecDeque<[f32; Joint::COUNT]>,
    averages: VecDeque<f32>,
}

impl ScoreSmoother {
    /// capacity は 1 以上であること
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "smoothing window capacity must be positive");
        Self {
            capacity,
            per_joint: VecDeque::with_capacity(capacity),
            averages: VecDeque::with_capacity(capacity),
        }
    }

    /// 最新フレームの偏差を追加。満杯なら最古を破棄
    pub fn push(&mut self, deviation: &Deviation) {
        if self.per_joint.len() == self.capacity {
            self.per_joint.pop_front();
            self.averages.pop_front();
        }
        self.per_joint.push_back(deviation.per_joint);
        self.averages.push_back(deviation.average);
    }

    /// 保持中エントリの平均。まだ1件もなければ None
    pub fn average(&self) -> Option<Deviation> {
        if self.averages.is_empty() {
            return None;
        }
        let n = self.averages.len() as f32;

        let mut per_joint = [0.0f32; Joint::COUNT];
        for entry in &self.per_joint {
            for (acc, v) in per_joint.iter_mut().zip(entry.iter()) {
                *acc += v;
            }
        }
        for acc in &mut per_joint {
            *acc /= n;
        }

        let average = self.averages.iter().sum::<f32>() / n;

        Some(Deviation { per_joint, average })
    }

    /// 保持中のエントリ数
    pub fn len(&self) -> usize {
        self.averages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.averages.is_empty()
    }

    pub fn reset(&mut self) {
        self.per_joint.clear();
        self.averages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dev(value: f32) -> Deviation {
        Deviation {
            per_joint: [value; Joint::COUNT],
            average: value,
        }
    }

    #[test]
    fn test_empty_returns_none() {
        let s = ScoreSmoother::new(40);
        assert!(s.average().is_none());
        assert!(s.is_empty());
    }

    #[test]
    fn test_constant_input_fills_to_exact_value() {
        let mut s = ScoreSmoother::new(40);
        for _ in 0..40 {
            s.push(&dev(0.25));
        }
        assert_eq!(s.len(), 40);
        let avg = s.average().unwrap();
        assert_eq!(avg.average, 0.25);
        assert_eq!(avg.per_joint, [0.25; Joint::COUNT]);
    }

    #[test]
    fn test_warmup_averages_over_held_entries() {
        let mut s = ScoreSmoother::new(40);
        s.push(&dev(0.0));
        s.push(&dev(1.0));
        assert_eq!(s.len(), 2);
        let avg = s.average().unwrap();
        assert!((avg.average - 0.5).abs() < 1e-6);
        assert!((avg.per_joint[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_evicts_oldest_at_capacity() {
        let mut s = ScoreSmoother::new(2);
        s.push(&dev(1.0));
        s.push(&dev(0.5));
        s.push(&dev(0.5));
        assert_eq!(s.len(), 2);
        let avg = s.average().unwrap();
        assert!((avg.average - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_per_joint_elementwise_mean() {
        let mut s = ScoreSmoother::new(4);
        let mut a = dev(0.0);
        a.per_joint[3] = 0.8;
        let mut b = dev(0.0);
        b.per_joint[3] = 0.4;
        s.push(&a);
        s.push(&b);
        let avg = s.average().unwrap();
        assert!((avg.per_joint[3] - 0.6).abs() < 1e-6);
        assert_eq!(avg.per_joint[0], 0.0);
    }

    #[test]
    fn test_reset_clears_window() {
        let mut s = ScoreSmoother::new(4);
        s.push(&dev(0.7));
        s.reset();
        assert!(s.average().is_none());
        assert_eq!(s.len(), 0);
    }

    #[test]
    #[should_panic]
    fn test_zero_capacity_panics() {
        let _ = ScoreSmoother::new(0);
    }
}
