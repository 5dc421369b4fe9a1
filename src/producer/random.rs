//! Random churn producer
//!
//! Seeds the hub with N distinct random edges over N nodes, then forever
//! replaces one random edge per tick: delete one, add a fresh one. Endpoint
//! nodes are announced with default attributes the first time they appear.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;

use super::default_node_attrs;
use crate::hub::GraphHub;
use crate::types::AttributeMap;

pub struct RandomChurn {
    hub: Arc<GraphHub>,
    nr_nodes: usize,
    tick: Duration,
    known_nodes: HashSet<usize>,
    edges: Vec<(usize, usize)>,
    edge_set: HashSet<(usize, usize)>,
}

impl RandomChurn {
    pub fn new(hub: Arc<GraphHub>, nr_nodes: usize) -> Self {
        Self {
            hub,
            nr_nodes,
            tick: Duration::from_secs(1),
            known_nodes: HashSet::new(),
            edges: Vec::new(),
            edge_set: HashSet::new(),
        }
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Run forever: seed, then churn one edge per tick.
    pub async fn run(mut self) {
        if self.nr_nodes < 2 {
            eprintln!("[Producer] need at least 2 nodes to generate edges");
            return;
        }

        eprintln!(
            "[Producer] generating random graph with {} nodes",
            self.nr_nodes
        );
        self.seed();

        loop {
            self.churn_once();
            tokio::time::sleep(self.tick).await;
        }
    }

    /// Fill the graph up to nr_nodes distinct random edges.
    pub fn seed(&mut self) {
        let target = self.nr_nodes;
        while self.edges.len() < target {
            self.add_random_edge();
        }
    }

    /// Delete one random edge and add a fresh one. Edge count is invariant.
    pub fn churn_once(&mut self) {
        if self.edges.is_empty() {
            return;
        }
        let victim = rand::thread_rng().gen_range(0..self.edges.len());
        let (source, target) = self.edges.swap_remove(victim);
        self.edge_set.remove(&(source, target));
        self.hub.delete_edge(&edge_id(source, target), now());

        self.add_random_edge();
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn add_random_edge(&mut self) {
        let mut rng = rand::thread_rng();
        loop {
            let source = rng.gen_range(0..self.nr_nodes);
            let mut target = rng.gen_range(0..self.nr_nodes - 1);
            if target >= source {
                target += 1;
            }
            if self.edge_set.contains(&(source, target)) {
                continue;
            }

            self.ensure_node(source);
            self.ensure_node(target);

            let mut attrs = AttributeMap::new();
            attrs.insert("weight".to_string(), 2.0.into());
            self.hub.add_edge(
                &edge_id(source, target),
                &source.to_string(),
                &target.to_string(),
                true,
                attrs,
                now(),
            );

            self.edges.push((source, target));
            self.edge_set.insert((source, target));
            return;
        }
    }

    fn ensure_node(&mut self, index: usize) {
        if self.known_nodes.insert(index) {
            let id = index.to_string();
            self.hub.add_node(&id, default_node_attrs(&id), now());
        }
    }
}

fn edge_id(source: usize, target: usize) -> String {
    format!("{}_{}", source, target)
}

fn now() -> Option<f64> {
    Some(chrono::Utc::now().timestamp() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_reaches_edge_target() {
        let hub = Arc::new(GraphHub::new());
        let mut churn = RandomChurn::new(hub.clone(), 10);
        churn.seed();

        assert_eq!(churn.edge_count(), 10);
        assert_eq!(hub.edge_count(), 10);
        assert!(hub.node_count() <= 10);
        assert!(hub.node_count() >= 2);
    }

    #[test]
    fn test_churn_keeps_edge_count_invariant() {
        let hub = Arc::new(GraphHub::new());
        let mut churn = RandomChurn::new(hub.clone(), 8);
        churn.seed();

        for _ in 0..20 {
            churn.churn_once();
            assert_eq!(churn.edge_count(), 8);
            assert_eq!(hub.edge_count(), 8);
        }
    }
}
