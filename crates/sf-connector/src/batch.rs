//! Pending composite-graph writes for one transaction.

use serde_json::Value;

use busbar_sf_client::RequestMethod;
use busbar_sf_rest::{CompositeGraphRequest, CompositeSubrequest, GraphRequest};

/// Graph used when a write is not part of a repeated section.
pub const DEFAULT_GRAPH_ID: &str = "0";

/// One queued write request.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub method: RequestMethod,
    /// Instance-relative REST path.
    pub url: String,
    pub reference_id: String,
    pub body: Value,
    pub record_type: String,
    /// Human-readable summary used in result logs ("Create Lead").
    pub description: String,
}

/// Fragments the server commits or rolls back together.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    pub id: String,
    pub fragments: Vec<Fragment>,
}

/// Writes accumulated between two flushes.
///
/// Graphs keep the order in which they were first used. Reference ids are
/// minted from one counter that survives [`take`](Batch::take), so they are
/// unique across graphs and across every flush until the batch is replaced
/// with [`Batch::new`].
#[derive(Debug, Default)]
pub struct Batch {
    graphs: Vec<Graph>,
    next_reference: usize,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a write into `graph_id` and return its reference id.
    pub fn push(
        &mut self,
        graph_id: &str,
        method: RequestMethod,
        url: impl Into<String>,
        body: Value,
        record_type: impl Into<String>,
        description: impl Into<String>,
    ) -> String {
        let reference_id = format!("fa{}", self.next_reference);
        self.next_reference += 1;

        let fragment = Fragment {
            method,
            url: url.into(),
            reference_id: reference_id.clone(),
            body,
            record_type: record_type.into(),
            description: description.into(),
        };

        match self.graphs.iter_mut().find(|g| g.id == graph_id) {
            Some(graph) => graph.fragments.push(fragment),
            None => self.graphs.push(Graph {
                id: graph_id.to_string(),
                fragments: vec![fragment],
            }),
        }

        reference_id
    }

    /// Find the fragment a response reference id answers.
    pub fn fragment(&self, reference_id: &str) -> Option<&Fragment> {
        self.graphs
            .iter()
            .flat_map(|g| g.fragments.iter())
            .find(|f| f.reference_id == reference_id)
    }

    pub fn graphs(&self) -> &[Graph] {
        &self.graphs
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    /// Number of queued fragments across all graphs.
    pub fn len(&self) -> usize {
        self.graphs.iter().map(|g| g.fragments.len()).sum()
    }

    /// Drain the queued graphs. Reference numbering carries on.
    pub fn take(&mut self) -> Batch {
        Batch {
            graphs: std::mem::take(&mut self.graphs),
            next_reference: self.next_reference,
        }
    }

    /// Composite-graph request body for this batch.
    pub fn to_request(&self) -> CompositeGraphRequest {
        CompositeGraphRequest {
            graphs: self
                .graphs
                .iter()
                .map(|graph| GraphRequest {
                    graph_id: graph.id.clone(),
                    composite_request: graph
                        .fragments
                        .iter()
                        .map(|f| CompositeSubrequest {
                            method: f.method.as_str().to_string(),
                            url: f.url.clone(),
                            reference_id: f.reference_id.clone(),
                            body: Some(f.body.clone()),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
