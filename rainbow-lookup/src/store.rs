use std::future::Future;

use crate::error::StoreError;
use crate::query::BatchQuery;

/// A returned row: `(preimage, digest)`, in select-list order.
pub type Row = (String, String);

/// A keyed columnar store that can answer a batch lookup.
///
/// Implementations run the query once, drain the cursor fully and return
/// rows in the order the store produced them.
pub trait KeyedStore {
    fn fetch(&self, query: &BatchQuery) -> impl Future<Output = Result<Vec<Row>, StoreError>> + Send;
}

impl<S: KeyedStore + Sync> KeyedStore for &S {
    fn fetch(&self, query: &BatchQuery) -> impl Future<Output = Result<Vec<Row>, StoreError>> + Send {
        (**self).fetch(query)
    }
}
