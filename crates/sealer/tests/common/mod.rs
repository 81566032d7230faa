//! Shared fixtures for sealer integration tests
//!
//! `ScriptedClient` is an in-process sealing service: it records every call,
//! tracks how many seal requests are in flight, and fails or rejects the
//! blocks it was told to.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use dagseal_core::{DagNode, MemoryDagStore, NodeId};
use dagseal_sealer::{Result, SealError, SealReply, SealingClient, SessionKey};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// One observed call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Start { root: NodeId, key: String },
    Block { root: NodeId, key: String, node: String },
    End { root: NodeId, key: String },
}

#[derive(Default)]
pub struct ScriptedClient {
    /// Payload -> test name of the node it belongs to
    names: Mutex<HashMap<Bytes, String>>,
    calls: Mutex<Vec<Call>>,
    failing: Mutex<HashSet<String>>,
    rejecting: Mutex<HashSet<String>>,
    panicking: Mutex<HashSet<String>>,
    reject_root: Mutex<bool>,
    delay: Mutex<Duration>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Teach the client which node a payload belongs to
    pub fn name(&self, node: &DagNode, name: &str) {
        self.names.lock().insert(node.raw_data().clone(), name.to_string());
    }

    pub fn fail_on(&self, name: &str) {
        self.failing.lock().insert(name.to_string());
    }

    pub fn reject_on(&self, name: &str) {
        self.rejecting.lock().insert(name.to_string());
    }

    pub fn panic_on(&self, name: &str) {
        self.panicking.lock().insert(name.to_string());
    }

    pub fn reject_root(&self) {
        *self.reject_root.lock() = true;
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = delay;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Names of sealed blocks in the order their requests arrived
    pub fn block_order(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                Call::Block { node, .. } => Some(node.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn name_of(&self, payload: &Bytes) -> String {
        self.names
            .lock()
            .get(payload)
            .cloned()
            .unwrap_or_else(|| format!("<{} bytes>", payload.len()))
    }
}

#[async_trait]
impl SealingClient for ScriptedClient {
    async fn start_seal(&self, root: &NodeId, key: &SessionKey, _payload: Bytes) -> Result<SealReply> {
        self.calls.lock().push(Call::Start {
            root: *root,
            key: key.to_string(),
        });
        if *self.reject_root.lock() {
            return Ok(SealReply::Rejected {
                message: "no capacity".to_string(),
            });
        }
        Ok(SealReply::Accepted {
            location: format!("/sealed/{}", root.to_hex()),
        })
    }

    async fn seal_block(&self, root: &NodeId, key: &SessionKey, payload: Bytes) -> Result<SealReply> {
        let name = self.name_of(&payload);
        self.calls.lock().push(Call::Block {
            root: *root,
            key: key.to_string(),
            node: name.clone(),
        });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let delay = *self.delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.panicking.lock().contains(&name) {
            panic!("scripted panic sealing {name}");
        }
        if self.failing.lock().contains(&name) {
            return Err(SealError::Status {
                operation: "Seal",
                status: 500,
            });
        }
        if self.rejecting.lock().contains(&name) {
            return Ok(SealReply::Rejected {
                message: format!("cannot seal {name} now"),
            });
        }
        Ok(SealReply::Accepted {
            location: format!("/sealed/{name}"),
        })
    }

    async fn end_seal(&self, root: &NodeId, key: &SessionKey) -> Result<SealReply> {
        self.calls.lock().push(Call::End {
            root: *root,
            key: key.to_string(),
        });
        Ok(SealReply::Accepted {
            location: String::new(),
        })
    }

    async fn retrieve(&self, _location: &str) -> Result<Option<Bytes>> {
        Ok(None)
    }
}

/// DAG fixture with named nodes
pub struct Fixture {
    pub store: MemoryDagStore,
    pub ids: HashMap<String, NodeId>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            store: MemoryDagStore::new(),
            ids: HashMap::new(),
        }
    }

    /// Add a node linking to previously added `children`
    pub fn node(&mut self, client: &ScriptedClient, name: &str, children: &[&str]) -> NodeId {
        let links: Vec<NodeId> = children.iter().map(|c| self.ids[*c]).collect();
        let node = if links.is_empty() {
            DagNode::leaf(format!("leaf {name}").into_bytes())
        } else {
            DagNode::branch(links, name.as_bytes())
        };
        client.name(&node, name);
        let id = self.store.put(node);
        self.ids.insert(name.to_string(), id);
        id
    }

    pub fn id(&self, name: &str) -> NodeId {
        self.ids[name]
    }

    /// Root R with children A {A1, A2} and B {B1, B2}
    pub fn balanced(client: &ScriptedClient) -> (Self, NodeId) {
        let mut fx = Self::new();
        for leaf in ["A1", "A2", "B1", "B2"] {
            fx.node(client, leaf, &[]);
        }
        fx.node(client, "A", &["A1", "A2"]);
        fx.node(client, "B", &["B1", "B2"]);
        let root = fx.node(client, "R", &["A", "B"]);
        (fx, root)
    }

    /// Root R with `width` leaf children c0..c{width-1}
    pub fn wide(client: &ScriptedClient, width: usize) -> (Self, NodeId) {
        let mut fx = Self::new();
        let names: Vec<String> = (0..width).map(|i| format!("c{i}")).collect();
        for name in &names {
            fx.node(client, name, &[]);
        }
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let root = fx.node(client, "R", &refs);
        (fx, root)
    }
}
