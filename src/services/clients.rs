//! Cached read path for client queries.
//!
//! Listing and lookup results are memoized in a [`TtlCache`] keyed by the
//! query. Writes made through *this* layer invalidate the entries they can
//! affect; writes made through the registry bypass the cache entirely and
//! leave existing entries to expire on their own (a documented staleness
//! window of at most one TTL).

use crate::cache::TtlCache;
use crate::domain::client::{Client, NewClient};
use crate::domain::types::ClientId;
use crate::services::{ServiceError, ServiceResult};
use crate::store::{ClientListQuery, ClientStore};

/// One page of clients with the total matching count.
pub type ClientPage = (usize, Vec<Client>);

/// Lists clients through the cache; a miss goes to the store and the result
/// is memoized under the query's key.
pub fn list_clients_cached<S>(
    store: &S,
    cache: &TtlCache<ClientPage>,
    query: ClientListQuery,
) -> ServiceResult<ClientPage>
where
    S: ClientStore + ?Sized,
{
    let key = query.cache_key();
    if let Some(hit) = cache.get(&key) {
        return Ok(hit);
    }
    let page = store.list_clients(query)?;
    cache.set(key, page.clone());
    Ok(page)
}

/// Fetches one client through the cache. Only hits are memoized; a missing
/// row surfaces as [`ServiceError::NotFound`] and is not cached.
pub fn get_client_cached<S>(
    store: &S,
    cache: &TtlCache<Client>,
    client_id: &ClientId,
) -> ServiceResult<Client>
where
    S: ClientStore + ?Sized,
{
    if let Some(hit) = cache.get(client_id.as_str()) {
        return Ok(hit);
    }
    match store.get_client_by_id(client_id)? {
        Some(client) => {
            cache.set(client_id.as_str(), client.clone());
            Ok(client)
        }
        None => Err(ServiceError::NotFound),
    }
}

/// Creates a client through the cached read path's write side. List keys
/// derive from free-form queries, so the whole list namespace is dropped.
pub fn create_client<S>(
    store: &S,
    cache: &TtlCache<ClientPage>,
    new_client: &NewClient,
) -> ServiceResult<Client>
where
    S: ClientStore + ?Sized,
{
    let client = store.insert_client(new_client)?;
    cache.invalidate_all();
    Ok(client)
}
