//! ROC curve and area under it
//!
//! Both routines return `None` when the set holds a single class, since the
//! false or true positive rate is then undefined.

use crate::prediction::PredictionSet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single operating point of the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RocPoint {
    /// Score threshold (`score >= threshold` predicts positive). `None` for the
    /// origin, where nothing is predicted positive.
    pub threshold: Option<f64>,
    pub fpr: f64,
    pub tpr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RocCurve {
    /// Points from (0, 0) to (1, 1), one per distinct score.
    pub points: Vec<RocPoint>,
    /// Trapezoidal area under `points`.
    pub auc: f64,
}

/// Sweeps every distinct probability in descending order and records the
/// resulting (FPR, TPR) pair.
pub fn roc_curve(set: &PredictionSet) -> Option<RocCurve> {
    let positives = set.positives();
    let negatives = set.negatives();
    if positives == 0 || negatives == 0 {
        return None;
    }

    let labels = set.y_true();
    let scores = set.y_prob();
    let mut order: Vec<usize> = (0..set.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let p = positives as f64;
    let n = negatives as f64;

    let mut points = Vec::with_capacity(order.len() + 1);
    points.push(RocPoint {
        threshold: None,
        fpr: 0.0,
        tpr: 0.0,
    });

    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut i = 0;
    while i < order.len() {
        let threshold = scores[order[i]];
        while i < order.len() && scores[order[i]] == threshold {
            if labels[order[i]] == 1 {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }
        points.push(RocPoint {
            threshold: Some(threshold),
            fpr: fp as f64 / n,
            tpr: tp as f64 / p,
        });
    }

    let auc = points
        .windows(2)
        .map(|w| (w[1].fpr - w[0].fpr) * (w[1].tpr + w[0].tpr) / 2.0)
        .sum();

    Some(RocCurve { points, auc })
}

/// Rank-based (Mann-Whitney) ROC-AUC. Tied scores share the average of the
/// ranks they span, which makes the result equal to the trapezoidal area
/// under [`roc_curve`].
pub fn roc_auc(set: &PredictionSet) -> Option<f64> {
    let positives = set.positives();
    let negatives = set.negatives();
    if positives == 0 || negatives == 0 {
        return None;
    }

    let labels = set.y_true();
    let scores = set.y_prob();
    let mut order: Vec<usize> = (0..set.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut positive_rank_sum = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start;
        while end + 1 < order.len() && scores[order[end + 1]] == scores[order[start]] {
            end += 1;
        }
        // 1-based ranks start+1 ..= end+1
        let average_rank = (start + end + 2) as f64 / 2.0;
        let tied_positives = order[start..=end]
            .iter()
            .filter(|&&idx| labels[idx] == 1)
            .count();
        positive_rank_sum += average_rank * tied_positives as f64;
        start = end + 1;
    }

    let p = positives as f64;
    let n = negatives as f64;
    Some((positive_rank_sum - p * (p + 1.0) / 2.0) / (p * n))
}
