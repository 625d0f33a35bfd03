use crate::service::ServiceError;

/// Which lookup stream a suggestion list belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Repos,
    Prs,
}

impl StreamKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Repos => "repos",
            Self::Prs => "prs",
        }
    }
}

/// Identifies one issued lookup. A response may only be applied while its
/// ticket's epoch is still the stream's current epoch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub kind: StreamKind,
    pub epoch: u64,
    pub query: String,
}

/// Outcome of feeding a lookup response back into its stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The list was replaced; carries the new length.
    Applied(usize),
    /// A newer lookup was issued (or the list was cleared) since this one.
    Stale,
    /// The lookup failed; the previous list is kept.
    Failed,
}

/// The suggestion list for one logical query stream plus the bookkeeping
/// needed to discard out-of-order responses.
#[derive(Debug, Clone)]
pub struct SuggestionStream {
    kind: StreamKind,
    epoch: u64,
    latest_query: Option<String>,
    in_flight: bool,
    items: Vec<String>,
    max_items: usize,
}

impl SuggestionStream {
    pub fn new(kind: StreamKind, max_items: usize) -> Self {
        Self {
            kind,
            epoch: 0,
            latest_query: None,
            in_flight: false,
            items: Vec::new(),
            max_items,
        }
    }

    pub fn kind(&self) -> StreamKind {
        self.kind
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn latest_query(&self) -> Option<&str> {
        self.latest_query.as_deref()
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Start a lookup for `query`, superseding any lookup still in flight.
    pub fn begin(&mut self, query: impl Into<String>) -> Ticket {
        let query = query.into();
        self.epoch = self.epoch.wrapping_add(1);
        self.latest_query = Some(query.clone());
        self.in_flight = true;
        Ticket {
            kind: self.kind,
            epoch: self.epoch,
            query,
        }
    }

    /// Apply a lookup response. Stale responses never touch the list and
    /// failures leave the last good list in place.
    pub fn resolve(
        &mut self,
        ticket: &Ticket,
        result: Result<Vec<String>, ServiceError>,
    ) -> Resolution {
        if ticket.kind != self.kind || ticket.epoch != self.epoch {
            tracing::debug!(
                "suggest[{}]: discarding stale response for {:?} (epoch {} < {})",
                self.kind.label(),
                ticket.query,
                ticket.epoch,
                self.epoch
            );
            return Resolution::Stale;
        }
        self.in_flight = false;
        match result {
            Ok(mut items) => {
                items.truncate(self.max_items);
                self.items = items;
                Resolution::Applied(self.items.len())
            }
            Err(e) => {
                tracing::warn!(
                    "suggest[{}]: lookup for {:?} failed: {e}",
                    self.kind.label(),
                    ticket.query
                );
                Resolution::Failed
            }
        }
    }

    /// Empty the list and invalidate every lookup still in flight.
    pub fn clear(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.latest_query = None;
        self.in_flight = false;
        self.items.clear();
    }
}
