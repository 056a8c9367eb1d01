use std::collections::HashSet;

use aml_domain::ports::SanctionsList;

/// Identity list loaded once at startup.
#[derive(Debug, Default, Clone)]
pub struct StaticSanctionsList {
    ids: HashSet<String>,
}

impl StaticSanctionsList {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            ids: ids
                .into_iter()
                .map(|id| id.as_ref().trim().to_string())
                .filter(|id| !id.is_empty())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl SanctionsList for StaticSanctionsList {
    fn is_sanctioned(&self, identity_id: &str) -> bool {
        self.ids.contains(identity_id.trim())
    }
}
