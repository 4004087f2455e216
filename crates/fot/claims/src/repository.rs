use crate::error::ClaimError;
use fot_types::{Claim, ClaimId};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// Append-only claim storage owned by the host.
///
/// Implementations must never rewrite a stored claim except through
/// [`mark_collapsed`](ClaimRepository::mark_collapsed).
pub trait ClaimRepository: Send + Sync {
    /// Store a new claim. Fails on a duplicate id.
    fn append(&self, claim: Claim) -> Result<ClaimId, ClaimError>;

    /// Store several claims together. Either all are stored or, on a
    /// duplicate id, none are.
    fn append_all(&self, claims: Vec<Claim>) -> Result<Vec<ClaimId>, ClaimError>;

    fn get(&self, id: &ClaimId) -> Result<Option<Claim>, ClaimError>;

    /// All claims in insertion order.
    fn list(&self) -> Result<Vec<Claim>, ClaimError>;

    fn by_problem(&self, problem: &str) -> Result<Vec<Claim>, ClaimError>;

    /// Set the collapsed flag. Returns `true` if the flag changed.
    fn mark_collapsed(&self, id: &ClaimId) -> Result<bool, ClaimError>;
}

/// In-process repository.
#[derive(Debug, Default)]
pub struct InMemoryClaimRepository {
    claims: RwLock<Vec<Claim>>,
    index: RwLock<HashMap<ClaimId, usize>>,
}

impl InMemoryClaimRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, ClaimError> {
        Ok(self.claims.read().map_err(|_| ClaimError::LockError)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, ClaimError> {
        Ok(self.len()? == 0)
    }

    pub fn collapsed_count(&self) -> Result<usize, ClaimError> {
        let claims = self.claims.read().map_err(|_| ClaimError::LockError)?;
        Ok(claims.iter().filter(|c| c.is_collapsed()).count())
    }
}

impl ClaimRepository for InMemoryClaimRepository {
    fn append(&self, claim: Claim) -> Result<ClaimId, ClaimError> {
        let mut claims = self.claims.write().map_err(|_| ClaimError::LockError)?;
        let mut index = self.index.write().map_err(|_| ClaimError::LockError)?;
        if index.contains_key(&claim.id) {
            return Err(ClaimError::Duplicate(claim.id));
        }
        let id = claim.id.clone();
        index.insert(id.clone(), claims.len());
        claims.push(claim);
        Ok(id)
    }

    fn append_all(&self, batch: Vec<Claim>) -> Result<Vec<ClaimId>, ClaimError> {
        let mut claims = self.claims.write().map_err(|_| ClaimError::LockError)?;
        let mut index = self.index.write().map_err(|_| ClaimError::LockError)?;
        let mut incoming = HashSet::with_capacity(batch.len());
        for claim in &batch {
            if index.contains_key(&claim.id) || !incoming.insert(&claim.id) {
                return Err(ClaimError::Duplicate(claim.id.clone()));
            }
        }
        let ids: Vec<ClaimId> = batch.iter().map(|c| c.id.clone()).collect();
        for claim in batch {
            index.insert(claim.id.clone(), claims.len());
            claims.push(claim);
        }
        Ok(ids)
    }

    fn get(&self, id: &ClaimId) -> Result<Option<Claim>, ClaimError> {
        let claims = self.claims.read().map_err(|_| ClaimError::LockError)?;
        let index = self.index.read().map_err(|_| ClaimError::LockError)?;
        Ok(index.get(id).and_then(|&i| claims.get(i)).cloned())
    }

    fn list(&self) -> Result<Vec<Claim>, ClaimError> {
        Ok(self
            .claims
            .read()
            .map_err(|_| ClaimError::LockError)?
            .clone())
    }

    fn by_problem(&self, problem: &str) -> Result<Vec<Claim>, ClaimError> {
        let claims = self.claims.read().map_err(|_| ClaimError::LockError)?;
        Ok(claims
            .iter()
            .filter(|c| c.addresses_problem == problem)
            .cloned()
            .collect())
    }

    fn mark_collapsed(&self, id: &ClaimId) -> Result<bool, ClaimError> {
        let mut claims = self.claims.write().map_err(|_| ClaimError::LockError)?;
        let index = self.index.read().map_err(|_| ClaimError::LockError)?;
        let slot = index
            .get(id)
            .and_then(|&i| claims.get_mut(i))
            .ok_or_else(|| ClaimError::NotFound(id.clone()))?;
        Ok(slot.mark_collapsed())
    }
}
