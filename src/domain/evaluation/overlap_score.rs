//! Sentence-level BLEU between an automated response and its correction.
//!
//! Tokens are lowercase whitespace-separated words. Precisions for 1- to
//! 4-grams are combined with uniform weights; a zero n-gram match count is
//! replaced by `EPSILON / total` so one missing order does not zero the score.

use std::collections::HashMap;

const MAX_ORDER: usize = 4;
const EPSILON: f64 = 0.1;

fn ngram_counts(tokens: &[&str], n: usize) -> HashMap<Vec<String>, usize> {
    let mut counts = HashMap::new();
    if tokens.len() >= n {
        for window in tokens.windows(n) {
            let key: Vec<String> = window.iter().map(|t| t.to_string()).collect();
            *counts.entry(key).or_insert(0) += 1;
        }
    }
    counts
}

/// Clipped n-gram matches and candidate n-gram total (at least 1).
fn modified_precision(reference: &[&str], candidate: &[&str], n: usize) -> (usize, usize) {
    let candidate_counts = ngram_counts(candidate, n);
    let reference_counts = ngram_counts(reference, n);

    let matched = candidate_counts
        .iter()
        .map(|(gram, count)| (*count).min(reference_counts.get(gram).copied().unwrap_or(0)))
        .sum();
    let total = candidate_counts.values().sum::<usize>().max(1);
    (matched, total)
}

/// BLEU of `candidate` against a single `reference`, in `[0, 1]`.
pub fn bleu(reference: &str, candidate: &str) -> f64 {
    let reference_lower = reference.to_lowercase();
    let candidate_lower = candidate.to_lowercase();
    let reference: Vec<&str> = reference_lower.split_whitespace().collect();
    let candidate: Vec<&str> = candidate_lower.split_whitespace().collect();

    if candidate.is_empty() {
        return 0.0;
    }

    let precisions: Vec<(usize, usize)> = (1..=MAX_ORDER)
        .map(|n| modified_precision(&reference, &candidate, n))
        .collect();

    if precisions[0].0 == 0 {
        return 0.0;
    }

    let log_sum: f64 = precisions
        .iter()
        .map(|&(matched, total)| {
            let p = if matched == 0 {
                EPSILON / total as f64
            } else {
                matched as f64 / total as f64
            };
            p.ln() / MAX_ORDER as f64
        })
        .sum();

    brevity_penalty(reference.len(), candidate.len()) * log_sum.exp()
}

fn brevity_penalty(reference_len: usize, candidate_len: usize) -> f64 {
    if candidate_len > reference_len {
        1.0
    } else if candidate_len == 0 {
        0.0
    } else {
        (1.0 - reference_len as f64 / candidate_len as f64).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_sentences_score_one() {
        let s = "our return policy allows returns within thirty days";
        assert!((bleu(s, s) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_sentences_score_zero() {
        assert_eq!(bleu("refunds take five days", "hello there friend"), 0.0);
    }

    #[test]
    fn empty_candidate_scores_zero() {
        assert_eq!(bleu("anything", "   "), 0.0);
    }

    #[test]
    fn comparison_is_case_insensitive() {
        assert!((bleu("Hello World again today", "hello world AGAIN today") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn partial_overlap_is_between_bounds() {
        let score = bleu(
            "standard shipping takes three to five business days",
            "standard shipping takes about a week",
        );
        assert!(score > 0.0 && score < 1.0);
    }

    #[test]
    fn short_candidate_is_penalized() {
        let reference = "the order ships within two business days of payment";
        let full = bleu(reference, reference);
        let short = bleu(reference, "the order ships");
        assert!(short < full);
    }
}
