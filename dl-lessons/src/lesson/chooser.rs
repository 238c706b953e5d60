//! Phrase fragment selection
//!
//! Opening, encouragement and closing fragments are picked per generation.
//! Production uses [`RandomChooser`]; tests pin output with [`FixedChooser`].

use rand::Rng;

pub trait PhraseChooser: Send + Sync {
    /// Index into a non-empty list of `len` options
    fn choose(&self, len: usize) -> usize;
}

/// Uniform choice from the thread-local RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomChooser;

impl PhraseChooser for RandomChooser {
    fn choose(&self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        rand::thread_rng().gen_range(0..len)
    }
}

/// Always the same position (clamped to the list length)
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedChooser(pub usize);

impl PhraseChooser for FixedChooser {
    fn choose(&self, len: usize) -> usize {
        self.0.min(len.saturating_sub(1))
    }
}

/// Pick one option through a chooser
pub fn pick<'a>(chooser: &dyn PhraseChooser, options: &[&'a str]) -> &'a str {
    match options {
        [] => "",
        [only] => only,
        _ => options[chooser.choose(options.len()).min(options.len() - 1)],
    }
}
