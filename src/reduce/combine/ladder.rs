//! Ladder façade: a configuration bound to an observer.
//!
//! The rung functions in [`super::code`] are pure folds. Announcing which rung
//! is running is a separate concern, handled here by an [`Observer`] that is
//! invoked once per call before the fold starts.

use super::code::Technique;
use crate::reduce::config::Reduction;
use crate::vector::Vector;

/// Hook invoked once per rung invocation.
pub trait Observer {
    fn on_run(&self, technique: Technique);
}

/// Observer that does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl Observer for Silent {
    #[inline(always)]
    fn on_run(&self, _technique: Technique) {}
}

/// Observer that emits a `tracing` debug event per run.
#[derive(Clone, Copy, Debug, Default)]
pub struct Traced;

impl Observer for Traced {
    fn on_run(&self, technique: Technique) {
        tracing::debug!(
            variant = technique.name(),
            technique = technique.description(),
            "running combine rung"
        );
    }
}

impl<F: Fn(Technique)> Observer for F {
    fn on_run(&self, technique: Technique) {
        self(technique)
    }
}

/// A reduction configuration with an observer attached.
///
/// # Example
/// ```
/// use combine_ladder::reduce::combine::{Ladder, Technique};
/// use combine_ladder::reduce::config::Sum;
/// use combine_ladder::vector::Vector;
///
/// let ladder = Ladder::new(Sum::<i64>::new());
/// let v = Vector::from_vec(vec![1, 2, 3, 4, 5, 6, 7]);
///
/// let mut dest = 0;
/// ladder.reduce(Technique::UnrollX3, &v, &mut dest);
/// assert_eq!(dest, 28);
/// ```
#[derive(Clone, Debug)]
pub struct Ladder<R, O = Silent> {
    config: R,
    observer: O,
}

impl<R: Reduction> Ladder<R, Silent> {
    pub fn new(config: R) -> Self {
        Self {
            config,
            observer: Silent,
        }
    }
}

impl<R: Reduction, O: Observer> Ladder<R, O> {
    /// Replace the observer.
    pub fn with_observer<P: Observer>(self, observer: P) -> Ladder<R, P> {
        Ladder {
            config: self.config,
            observer,
        }
    }

    pub fn config(&self) -> &R {
        &self.config
    }

    /// Run one rung, writing the fold of `v` into `dest`.
    pub fn reduce(&self, technique: Technique, v: &Vector<R::Elem>, dest: &mut R::Elem) {
        self.observer.on_run(technique);
        (technique.function::<R>())(&self.config, v, dest);
    }

    /// Run every rung in ladder order, returning each result.
    pub fn reduce_all(&self, v: &Vector<R::Elem>) -> Vec<(Technique, R::Elem)> {
        Technique::ALL
            .into_iter()
            .map(|technique| {
                let mut dest = self.config.identity();
                self.reduce(technique, v, &mut dest);
                (technique, dest)
            })
            .collect()
    }
}
