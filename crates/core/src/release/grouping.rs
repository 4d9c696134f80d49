//! Grouping of commission rows into release periods.

use std::collections::{BTreeSet, HashMap};

use alianza_shared::types::ClientId;
use serde::{Deserialize, Serialize};

use super::rule::normalize_client_name;
use crate::commission::CommissionPeriod;

/// Identity of a release period: normalized client name plus month.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReleaseKey {
    /// Normalized client name.
    pub client_name: String,
    /// Period.
    pub period: CommissionPeriod,
}

/// Which periods a batch run re-evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReleaseScope {
    /// Restrict to one period; `None` scans every period.
    #[serde(skip)]
    pub period: Option<CommissionPeriod>,
    /// Only consider periods that still have unreleased rows.
    pub pending_only: bool,
}

/// Maps normalized client names to every client id carrying that name.
///
/// Duplicate client records with the same legal name are one economic entity
/// for release purposes.
#[derive(Debug, Clone, Default)]
pub struct ClientNameIndex {
    names: HashMap<ClientId, String>,
    members: HashMap<String, Vec<ClientId>>,
}

impl ClientNameIndex {
    /// Builds the index from (client id, stored name) pairs.
    pub fn new<'a, I>(clients: I) -> Self
    where
        I: IntoIterator<Item = (ClientId, &'a str)>,
    {
        let mut index = Self::default();
        for (client_id, name) in clients {
            let normalized = normalize_client_name(name);
            index
                .members
                .entry(normalized.clone())
                .or_default()
                .push(client_id);
            index.names.insert(client_id, normalized);
        }
        index
    }

    /// Normalized name of a client.
    #[must_use]
    pub fn name_of(&self, client_id: ClientId) -> Option<&str> {
        self.names.get(&client_id).map(String::as_str)
    }

    /// Every client sharing the normalized name.
    #[must_use]
    pub fn members(&self, normalized_name: &str) -> &[ClientId] {
        self.members
            .get(normalized_name)
            .map_or(&[], Vec::as_slice)
    }

    /// Every client in the same name group as `client_id`, itself included.
    #[must_use]
    pub fn group_of(&self, client_id: ClientId) -> Vec<ClientId> {
        match self.name_of(client_id) {
            Some(name) => self.members(name).to_vec(),
            None => vec![client_id],
        }
    }

    /// Distinct release keys for a set of (client, period) rows.
    ///
    /// Rows whose client is unknown to the index are skipped.
    pub fn release_keys<I>(&self, rows: I) -> BTreeSet<ReleaseKey>
    where
        I: IntoIterator<Item = (ClientId, CommissionPeriod)>,
    {
        rows.into_iter()
            .filter_map(|(client_id, period)| {
                self.name_of(client_id).map(|name| ReleaseKey {
                    client_name: name.to_string(),
                    period,
                })
            })
            .collect()
    }
}
