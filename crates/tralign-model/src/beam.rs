//! Bounded beam-search decode.
//!
//! The search is written against a scorer closure so it can be exercised
//! without model weights: the closure receives the decoder token prefix
//! (starting with the decoder start token) and returns log-probabilities
//! over the vocabulary for the next position.

use anyhow::Result;

/// Parameters of one beam-search decode.
#[derive(Debug, Clone, Copy)]
pub struct BeamParams {
    /// Number of hypotheses kept alive at each step.
    pub width: usize,
    /// End-of-sequence is masked until this many tokens were generated.
    pub min_len: usize,
    /// Hard cap on generated tokens; unfinished hypotheses stop here.
    pub max_len: usize,
    pub start_token: u32,
    pub eos_token: u32,
}

#[derive(Debug, Clone)]
struct Hypothesis {
    tokens: Vec<u32>,
    score: f32,
    finished: bool,
}

impl Hypothesis {
    /// Tokens generated so far, excluding the start token.
    fn generated(&self) -> usize {
        self.tokens.len() - 1
    }

    /// Length-normalized score used for the final ranking.
    fn normalized(&self) -> f32 {
        self.score / self.generated().max(1) as f32
    }
}

fn top_k(logprobs: &[f32], k: usize) -> Vec<(usize, f32)> {
    let mut indexed: Vec<(usize, f32)> = logprobs.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| b.1.total_cmp(&a.1));
    indexed.truncate(k);
    indexed
}

/// Run a beam-search decode and return the generated tokens of the best
/// hypothesis, without the start token or the trailing end-of-sequence.
pub fn beam_search<F>(mut scorer: F, params: &BeamParams) -> Result<Vec<u32>>
where
    F: FnMut(&[u32]) -> Result<Vec<f32>>,
{
    let width = params.width.max(1);
    let mut beams = vec![Hypothesis {
        tokens: vec![params.start_token],
        score: 0.0,
        finished: false,
    }];

    while beams.iter().any(|h| !h.finished) {
        let mut candidates: Vec<Hypothesis> = Vec::with_capacity(width * width);

        for beam in &beams {
            if beam.finished {
                candidates.push(beam.clone());
                continue;
            }
            if beam.generated() >= params.max_len {
                let mut done = beam.clone();
                done.finished = true;
                candidates.push(done);
                continue;
            }

            let mut logprobs = scorer(&beam.tokens)?;
            if beam.generated() < params.min_len {
                if let Some(lp) = logprobs.get_mut(params.eos_token as usize) {
                    *lp = f32::NEG_INFINITY;
                }
            }

            for (token, lp) in top_k(&logprobs, width) {
                let token = token as u32;
                let mut tokens = beam.tokens.clone();
                tokens.push(token);
                candidates.push(Hypothesis {
                    tokens,
                    score: beam.score + lp,
                    finished: token == params.eos_token,
                });
            }
        }

        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        candidates.truncate(width);
        beams = candidates;
    }

    let best = beams
        .into_iter()
        .max_by(|a, b| a.normalized().total_cmp(&b.normalized()))
        .unwrap_or(Hypothesis {
            tokens: vec![params.start_token],
            score: 0.0,
            finished: true,
        });

    let mut tokens = best.tokens;
    tokens.remove(0);
    if tokens.last() == Some(&params.eos_token) {
        tokens.pop();
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: u32 = 0;
    const EOS: u32 = 1;
    const A: u32 = 2;
    const B: u32 = 3;

    fn params(width: usize, min_len: usize, max_len: usize) -> BeamParams {
        BeamParams {
            width,
            min_len,
            max_len,
            start_token: START,
            eos_token: EOS,
        }
    }

    #[test]
    fn eos_is_masked_until_min_len() {
        // The scorer always prefers EOS overwhelmingly.
        let scorer = |_prefix: &[u32]| Ok(vec![-20.0, 0.0, -1.0, -2.0]);
        let out = beam_search(scorer, &params(2, 3, 10)).unwrap();
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|&t| t != EOS));
    }

    #[test]
    fn decode_stops_at_max_len() {
        // EOS is never attractive, so the cap has to end the decode.
        let scorer = |_prefix: &[u32]| Ok(vec![-20.0, -30.0, -0.5, -1.0]);
        let out = beam_search(scorer, &params(3, 0, 4)).unwrap();
        assert_eq!(out, vec![A, A, A, A]);
    }

    #[test]
    fn beam_recovers_from_greedy_trap() {
        // Greedy takes A first (-0.1 beats -0.3) but the A branch then
        // collapses; the B branch finishes cheaply and wins overall.
        let scorer = |prefix: &[u32]| {
            Ok(match prefix {
                [START] => vec![f32::NEG_INFINITY, -10.0, -0.1, -0.3],
                [START, A] => vec![f32::NEG_INFINITY, -3.0, -10.0, -10.0],
                [START, B] => vec![f32::NEG_INFINITY, -0.1, -10.0, -10.0],
                _ => vec![f32::NEG_INFINITY, -0.1, -10.0, -10.0],
            })
        };
        let out = beam_search(scorer, &params(2, 0, 5)).unwrap();
        assert_eq!(out, vec![B]);
    }

    #[test]
    fn finished_hypotheses_are_not_rescored() {
        let mut calls = 0usize;
        let scorer = |_prefix: &[u32]| {
            calls += 1;
            Ok(vec![-20.0, 0.0, -5.0, -5.0])
        };
        let out = beam_search(scorer, &params(1, 0, 10)).unwrap();
        assert!(out.is_empty());
        assert_eq!(calls, 1);
    }
}
