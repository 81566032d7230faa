//! Recursive DAG sealing
//!
//! One driver walks the DAG depth-first and resolves nodes sequentially. The
//! root is sealed synchronously and gates everything else. Every other node is
//! dispatched as its own task once its whole subtree has been dispatched, so a
//! node's seal request is always issued after its descendants'. Dispatched
//! tasks are capped by a [`TaskPool`] and report the first failure through a
//! single-slot channel that the driver polls before each child.
//!
//! Cancellation is advisory: once a failure is seen the driver stops issuing
//! work, but tasks already dispatched run to completion and are always
//! drained before `seal` returns.

use crate::client::{SealReply, SealingClient};
use crate::config::SealerConfig;
use crate::error::SealError;
use crate::pool::{TaskPool, DEFAULT_CAPACITY};
use crate::session::{RandomSessionKeys, SessionKey, SessionKeySource};
use crate::Result;
use dagseal_core::{DagError, DagNode, DagStore, ExclusionSet, NodeId, SealedBlock, SealedMap};
use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

/// Outcome of a sealing operation that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SealStatus {
    /// The root is excluded from sealing; nothing was done
    NotNeeded,
    /// Every reachable node was sealed
    Sealed(SealedMap),
    /// The sealing service declined `node`; nothing is usable
    Rejected { node: NodeId, message: String },
}

/// Why a sealing operation stopped early
#[derive(Debug)]
enum Abort {
    Rejected { node: NodeId, message: String },
    Failed(SealError),
}

impl From<SealError> for Abort {
    fn from(e: SealError) -> Self {
        Abort::Failed(e)
    }
}

impl From<DagError> for Abort {
    fn from(e: DagError) -> Self {
        Abort::Failed(SealError::Dag(e))
    }
}

/// Seals whole DAGs through a [`SealingClient`]
pub struct Orchestrator {
    client: Arc<dyn SealingClient>,
    capacity: usize,
    exclusions: ExclusionSet,
    keys: Box<dyn SessionKeySource>,
}

impl Orchestrator {
    /// Orchestrator with default capacity, built-in exclusions and random keys
    pub fn new(client: Arc<dyn SealingClient>) -> Self {
        Self {
            client,
            capacity: DEFAULT_CAPACITY,
            exclusions: ExclusionSet::global().clone(),
            keys: Box::new(RandomSessionKeys::default()),
        }
    }

    /// Orchestrator configured from `config`
    pub fn from_config(config: &SealerConfig, client: Arc<dyn SealingClient>) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(client)
            .with_capacity(config.pool_capacity)
            .with_exclusions(config.exclusion_set()?))
    }

    /// Maximum concurrently outstanding seal requests per operation
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub fn with_exclusions(mut self, exclusions: ExclusionSet) -> Self {
        self.exclusions = exclusions;
        self
    }

    pub fn with_session_keys(mut self, keys: impl SessionKeySource + 'static) -> Self {
        self.keys = Box::new(keys);
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Seal every node reachable from `root`
    ///
    /// Returns a complete [`SealedMap`], or a single rejection or error. The
    /// first failure observed wins; partial results are never returned.
    pub async fn seal<D>(&self, root: &NodeId, dag: &D) -> Result<SealStatus>
    where
        D: DagStore + ?Sized,
    {
        if self.exclusions.contains(root) {
            info!("Skipping excluded root {}", root);
            return Ok(SealStatus::NotNeeded);
        }

        let root_node = dag.get(root).await?;
        let key = self.keys.next_key();
        info!("Sealing DAG {} (session {})", root, key);

        let payload = root_node.raw_data().clone();
        let size = payload.len() as u64;
        let location = match self.client.start_seal(root, &key, payload).await? {
            SealReply::Accepted { location } => location,
            SealReply::Rejected { message } => {
                warn!("Sealing service refused root {}: {}", root, message);
                return Ok(SealStatus::Rejected {
                    node: *root,
                    message,
                });
            }
        };

        let mut sealed = SealedMap::new();
        sealed.insert(*root, SealedBlock::new(location, size));

        let mut session = Session::new(*root, key, self.capacity, sealed);
        let walked = self.walk(&mut session, root_node, dag).await;
        let dispatched = session.dispatched;

        let sealed = match session.finish(walked).await {
            Ok(sealed) => sealed,
            Err(Abort::Rejected { node, message }) => {
                warn!("Sealing of {} aborted: service refused {}: {}", root, node, message);
                return Ok(SealStatus::Rejected { node, message });
            }
            Err(Abort::Failed(e)) => {
                warn!("Sealing of {} failed after {} dispatches: {}", root, dispatched, e);
                return Err(e);
            }
        };

        let key = session.key;
        match self.client.end_seal(root, &key).await? {
            SealReply::Accepted { .. } => {
                info!("Sealed DAG {}: {} nodes, {} bytes", root, sealed.len(), sealed.total_size());
                Ok(SealStatus::Sealed(sealed))
            }
            SealReply::Rejected { message } => {
                warn!("Sealing service refused to close session for {}: {}", root, message);
                Ok(SealStatus::Rejected {
                    node: *root,
                    message,
                })
            }
        }
    }

    /// Depth-first walk below `node`, dispatching each child after its subtree
    fn walk<'a, D>(
        &'a self,
        session: &'a mut Session,
        node: DagNode,
        dag: &'a D,
    ) -> BoxFuture<'a, std::result::Result<(), Abort>>
    where
        D: DagStore + ?Sized,
    {
        async move {
            for link in node.links() {
                session.check_failures()?;
                let child = dag.get(link).await?;
                self.walk(&mut *session, child.clone(), dag).await?;
                self.dispatch(session, child).await;
            }
            Ok(())
        }
        .boxed()
    }

    /// Reserve a slot and seal `child` in the background
    async fn dispatch(&self, session: &mut Session, child: DagNode) {
        let ticket = session.pool.ticket().await;

        let client = self.client.clone();
        let root = session.root;
        let key = session.key.clone();
        let sealed = session.sealed.clone();
        let failures = session.failures_tx.clone();

        let id = child.id();
        let payload = child.raw_data().clone();
        let size = payload.len() as u64;
        debug!("Dispatching seal of {} ({} bytes)", id, size);

        session.tasks.spawn(async move {
            let _ticket = ticket;
            let abort = match client.seal_block(&root, &key, payload).await {
                Ok(SealReply::Accepted { location }) => {
                    sealed.lock().insert(id, SealedBlock::new(location, size));
                    return;
                }
                Ok(SealReply::Rejected { message }) => Abort::Rejected { node: id, message },
                Err(e) => Abort::Failed(e),
            };
            // Slot already taken means an earlier failure wins
            let _ = failures.try_send(abort);
        });
        session.dispatched += 1;
        session.reap();
    }
}

/// State of one in-flight sealing operation
struct Session {
    root: NodeId,
    key: SessionKey,
    pool: TaskPool,
    sealed: Arc<Mutex<SealedMap>>,
    failures_tx: mpsc::Sender<Abort>,
    failures_rx: mpsc::Receiver<Abort>,
    tasks: JoinSet<()>,
    /// First dispatched task that died without reporting
    panicked: Option<JoinError>,
    dispatched: usize,
}

impl Session {
    fn new(root: NodeId, key: SessionKey, capacity: usize, sealed: SealedMap) -> Self {
        let (failures_tx, failures_rx) = mpsc::channel(1);
        Self {
            root,
            key,
            pool: TaskPool::new(capacity),
            sealed: Arc::new(Mutex::new(sealed)),
            failures_tx,
            failures_rx,
            tasks: JoinSet::new(),
            panicked: None,
            dispatched: 0,
        }
    }

    /// Drop finished tasks, keeping the first one that died
    fn reap(&mut self) {
        while let Some(joined) = self.tasks.try_join_next() {
            if let Err(e) = joined {
                self.panicked.get_or_insert(e);
            }
        }
    }

    /// Non-blocking poll of the failure slot
    fn check_failures(&mut self) -> std::result::Result<(), Abort> {
        match self.failures_rx.try_recv() {
            Ok(abort) => Err(abort),
            Err(_) => Ok(()),
        }
    }

    /// Drain dispatched work and settle on the first failure, if any
    async fn finish(&mut self, walked: std::result::Result<(), Abort>) -> std::result::Result<SealedMap, Abort> {
        self.pool.await_idle().await;

        let mut first = walked.err();

        // A failure reported after the driver's last check
        if first.is_none() {
            if let Ok(abort) = self.failures_rx.try_recv() {
                first = Some(abort);
            }
        }

        while let Some(joined) = self.tasks.join_next().await {
            if let Err(e) = joined {
                self.panicked.get_or_insert(e);
            }
        }
        if first.is_none() {
            if let Some(e) = self.panicked.take() {
                first = Some(Abort::Failed(SealError::Task(e.to_string())));
            }
        }

        match first {
            Some(abort) => Err(abort),
            None => Ok(std::mem::take(&mut *self.sealed.lock())),
        }
    }
}
