//! Compute-once holder for the fitted model.
//!
//! `ModelCache::get_or_fit` loads the reference table and fits the model the
//! first time it succeeds, then hands out the same `Arc<TrainedModel>` forever.
//!
//! - The check-then-fit-then-store sequence runs under a mutex, so concurrent
//!   first callers wait for one fit instead of racing.
//! - Once stored, reads go through `OnceLock` and take no lock.
//! - Failures are returned to the caller and not stored; nothing is retried
//!   here.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tracing::debug;

use crate::domain::{ReferenceDataset, TrainedModel};
use crate::error::EstimatorError;
use crate::fit::fitter::fit;

#[derive(Debug, Default)]
pub struct ModelCache {
    model: OnceLock<Arc<TrainedModel>>,
    dataset: OnceLock<Arc<ReferenceDataset>>,
    init: Mutex<()>,
    fits: AtomicUsize,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached model, if a fit has completed.
    pub fn get(&self) -> Option<Arc<TrainedModel>> {
        self.model.get().cloned()
    }

    /// The table the cached model was fitted on.
    pub fn dataset(&self) -> Option<Arc<ReferenceDataset>> {
        self.dataset.get().cloned()
    }

    /// Number of fits this cache has run (successful or not).
    pub fn fit_count(&self) -> usize {
        self.fits.load(Ordering::SeqCst)
    }

    /// Return the cached model, running `load` and the fit if there is none yet.
    pub fn get_or_fit<F>(&self, load: F) -> Result<Arc<TrainedModel>, EstimatorError>
    where
        F: FnOnce() -> Result<ReferenceDataset, EstimatorError>,
    {
        if let Some(model) = self.model.get() {
            debug!("model cache hit");
            return Ok(Arc::clone(model));
        }

        // The guarded section holds no data, so a poisoned lock is still usable.
        let _guard = self.init.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(model) = self.model.get() {
            debug!("model fitted by a concurrent caller");
            return Ok(Arc::clone(model));
        }

        // Publish only after a successful fit; a failed one reloads next time.
        let dataset = Arc::new(load()?);
        self.fits.fetch_add(1, Ordering::SeqCst);
        let model = Arc::new(fit(&dataset)?);
        let _ = self.dataset.set(dataset);
        let _ = self.model.set(Arc::clone(&model));
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::generate_reference;

    #[test]
    fn fits_once_and_returns_same_instance() {
        let cache = ModelCache::new();
        let loads = AtomicUsize::new(0);
        let load = || {
            loads.fetch_add(1, Ordering::SeqCst);
            generate_reference(200, 5, 0.2)
        };

        let first = cache.get_or_fit(load).unwrap();
        let second = cache.get_or_fit(load).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.fit_count(), 1);
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(cache.dataset().unwrap().len(), 200);
    }

    #[test]
    fn load_failure_is_not_cached() {
        let cache = ModelCache::new();
        let err = cache
            .get_or_fit(|| Err(EstimatorError::DataUnavailable("offline".to_string())))
            .unwrap_err();
        assert!(matches!(err, EstimatorError::DataUnavailable(_)));
        assert!(cache.get().is_none());
        assert_eq!(cache.fit_count(), 0);

        let model = cache.get_or_fit(|| generate_reference(50, 1, 0.2)).unwrap();
        assert!(Arc::ptr_eq(&model, &cache.get().unwrap()));
        assert_eq!(cache.fit_count(), 1);
    }

    #[test]
    fn fit_failure_reloads_on_next_call() {
        let cache = ModelCache::new();
        let too_small = generate_reference(2, 3, 0.2).unwrap();
        let err = cache.get_or_fit(|| Ok(too_small)).unwrap_err();
        assert!(matches!(err, EstimatorError::Fit(_)));
        assert!(cache.get().is_none());
        assert!(cache.dataset().is_none());
        assert_eq!(cache.fit_count(), 1);

        let model = cache.get_or_fit(|| generate_reference(60, 3, 0.2)).unwrap();
        assert!(Arc::ptr_eq(&model, &cache.get().unwrap()));
        assert_eq!(cache.dataset().unwrap().len(), 60);
        assert_eq!(cache.fit_count(), 2);
    }

    #[test]
    fn concurrent_first_callers_share_one_fit() {
        let cache = ModelCache::new();
        let models: Vec<Arc<TrainedModel>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| cache.get_or_fit(|| generate_reference(2000, 9, 0.2)).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(cache.fit_count(), 1);
        for model in &models[1..] {
            assert!(Arc::ptr_eq(&models[0], model));
        }
    }
}
