//! Thread-safe in-memory [`RequestTokenStore`] implementation.

// self
use crate::{
	_prelude::*,
	auth::RequestToken,
	store::{RequestTokenStore, StoreError, StoreFuture},
};

type StoreMap = Arc<RwLock<HashMap<String, PendingToken>>>;

#[derive(Clone, Debug)]
struct PendingToken {
	token: RequestToken,
	saved_at: OffsetDateTime,
}

/// Thread-safe storage backend that keeps request tokens in-process.
///
/// Entries older than the configured TTL are treated as absent and pruned on writes.
#[derive(Clone, Debug)]
pub struct MemoryStore {
	map: StoreMap,
	ttl: Duration,
}
impl MemoryStore {
	const DEFAULT_TTL: Duration = Duration::minutes(10);

	/// Creates a store whose entries expire after `ttl`.
	pub fn with_ttl(ttl: Duration) -> Self {
		Self { map: Default::default(), ttl: if ttl.is_negative() { Duration::ZERO } else { ttl } }
	}

	/// Number of entries currently held (expired ones included until pruned).
	pub fn len(&self) -> usize {
		self.map.read().len()
	}

	/// Returns true when the store holds no entries.
	pub fn is_empty(&self) -> bool {
		self.map.read().is_empty()
	}

	fn save_now(
		map: StoreMap,
		ttl: Duration,
		token: RequestToken,
		now: OffsetDateTime,
	) -> Result<(), StoreError> {
		let mut guard = map.write();

		guard.retain(|_, pending| now - pending.saved_at <= ttl);
		guard.insert(token.token.clone(), PendingToken { token, saved_at: now });

		Ok(())
	}

	fn take_now(
		map: StoreMap,
		ttl: Duration,
		oauth_token: &str,
		now: OffsetDateTime,
	) -> Option<RequestToken> {
		let pending = map.write().remove(oauth_token)?;

		(now - pending.saved_at <= ttl).then_some(pending.token)
	}
}
impl Default for MemoryStore {
	fn default() -> Self {
		Self::with_ttl(Self::DEFAULT_TTL)
	}
}
impl RequestTokenStore for MemoryStore {
	fn save(&self, token: RequestToken) -> StoreFuture<'_, ()> {
		let map = self.map.clone();
		let ttl = self.ttl;

		Box::pin(async move { Self::save_now(map, ttl, token, OffsetDateTime::now_utc()) })
	}

	fn take<'a>(&'a self, oauth_token: &'a str) -> StoreFuture<'a, Option<RequestToken>> {
		let map = self.map.clone();
		let ttl = self.ttl;

		Box::pin(async move { Ok(Self::take_now(map, ttl, oauth_token, OffsetDateTime::now_utc())) })
	}
}
