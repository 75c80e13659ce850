use std::sync::Arc;

use tracing::debug;

use crate::resolver::PrincipalResolver;
use crate::types::{AttributeQuery, Principal, SearchType};

/// A lazily wrapped sequence of principals returned by a search.
pub type PrincipalCursor = Box<dyn Iterator<Item = Arc<Principal>> + Send>;

/// Maps principal-name filters onto store attribute queries.
#[derive(Debug, Clone)]
pub struct SearchAdapter {
    resolver: PrincipalResolver,
}

impl SearchAdapter {
    pub fn new(resolver: PrincipalResolver) -> Self {
        SearchAdapter { resolver }
    }

    /// Find principals whose name equals `filter`, or all principals for `None`.
    ///
    /// Every search type runs the same query and no type filtering is applied
    /// to the results. Store errors produce an empty cursor.
    pub fn find_principals(&self, filter: Option<&str>, search_type: SearchType) -> PrincipalCursor {
        let query = match search_type {
            SearchType::Group | SearchType::NotGroup | SearchType::All => {
                AttributeQuery::principal_name(filter)
            }
        };

        match self.resolver.store().find_authorizables(&query) {
            Ok(records) => {
                debug!(event = "Search", phase = "Query", query = %query, search_type = %search_type);
                let resolver = self.resolver.clone();
                Box::new(records.map(move |record| resolver.wrap(record)))
            }
            Err(err) => {
                debug!(event = "Search", phase = "StoreError", query = %query, error = %err);
                Box::new(std::iter::empty())
            }
        }
    }
}
