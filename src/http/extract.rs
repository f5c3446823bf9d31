//! Handing validated values to downstream handlers.
//!
//! Values live in the request extensions inside a private stash keyed by
//! [`Source`], so they cannot collide with other middleware's extensions and
//! several sources can be validated on the same route.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::sync::Arc;

use axum::http::request::Parts;
use axum::http::{Extensions, Request};

use crate::source::Source;

#[derive(Clone, Default)]
struct Stash {
    values: HashMap<Source, Arc<dyn Any + Send + Sync>>,
}

/// Attach `value` to the request under `source`.
pub(crate) fn publish<T: Send + Sync + 'static>(
    extensions: &mut Extensions,
    source: Source,
    value: T,
) {
    if extensions.get::<Stash>().is_none() {
        extensions.insert(Stash::default());
    }
    if let Some(stash) = extensions.get_mut::<Stash>() {
        stash.values.insert(source, Arc::new(value));
    }
}

/// The value validated from `source`, if one of type `T` was published.
pub fn try_validated<T: Send + Sync + 'static>(
    extensions: &Extensions,
    source: Source,
) -> Option<Arc<T>> {
    let value = extensions.get::<Stash>()?.values.get(&source)?;
    Arc::clone(value).downcast::<T>().ok()
}

/// The value validated from `source`.
///
/// # Panics
///
/// When no value was published for `source` on this request, or when it is
/// not a `T`. Both mean the handler and its validation layer disagree.
pub fn validated<T: Send + Sync + 'static>(extensions: &Extensions, source: Source) -> Arc<T> {
    let Some(value) = extensions
        .get::<Stash>()
        .and_then(|stash| stash.values.get(&source))
    else {
        panic!("no validated value was published for source {source}");
    };

    match Arc::clone(value).downcast::<T>() {
        Ok(value) => value,
        Err(_) => panic!(
            "validated value for source {source} is not a `{}`",
            type_name::<T>()
        ),
    }
}

/// Extension trait for reading validated values off a request.
pub trait ValidatedExt {
    /// See [`validated`].
    fn validated<T: Send + Sync + 'static>(&self, source: Source) -> Arc<T>;

    /// See [`try_validated`].
    fn try_validated<T: Send + Sync + 'static>(&self, source: Source) -> Option<Arc<T>>;
}

impl<B> ValidatedExt for Request<B> {
    fn validated<T: Send + Sync + 'static>(&self, source: Source) -> Arc<T> {
        validated(self.extensions(), source)
    }

    fn try_validated<T: Send + Sync + 'static>(&self, source: Source) -> Option<Arc<T>> {
        try_validated(self.extensions(), source)
    }
}

impl ValidatedExt for Parts {
    fn validated<T: Send + Sync + 'static>(&self, source: Source) -> Arc<T> {
        validated(&self.extensions, source)
    }

    fn try_validated<T: Send + Sync + 'static>(&self, source: Source) -> Option<Arc<T>> {
        try_validated(&self.extensions, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Page(u32);

    #[test]
    fn test_publish_and_read_back() {
        let mut extensions = Extensions::new();
        publish(&mut extensions, Source::Query, Page(3));
        publish(&mut extensions, Source::Params, 7u64);

        assert_eq!(*validated::<Page>(&extensions, Source::Query), Page(3));
        assert_eq!(*validated::<u64>(&extensions, Source::Params), 7);
        assert!(try_validated::<Page>(&extensions, Source::Json).is_none());
        assert!(try_validated::<u64>(&extensions, Source::Query).is_none());
    }

    #[test]
    fn test_stash_does_not_touch_other_extensions() {
        let mut extensions = Extensions::new();
        extensions.insert(5u32);
        publish(&mut extensions, Source::Form, 9u32);

        assert_eq!(extensions.get::<u32>(), Some(&5));
        assert_eq!(*validated::<u32>(&extensions, Source::Form), 9);
    }

    #[test]
    #[should_panic(expected = "no validated value was published for source Query")]
    fn test_unpublished_source_panics() {
        let extensions = Extensions::new();
        validated::<Page>(&extensions, Source::Query);
    }

    #[test]
    #[should_panic(expected = "is not a")]
    fn test_wrong_type_panics() {
        let mut extensions = Extensions::new();
        publish(&mut extensions, Source::Query, Page(1));
        validated::<String>(&extensions, Source::Query);
    }
}
