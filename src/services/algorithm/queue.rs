//! 优先队列前沿
//!
//! 惰性删除的最小堆：同一节点可以多次入队，过期条目在出队时由调用方跳过。
//! 出队顺序完全确定：先比较优先级，再比较节点标识，最后比较入队序号。

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use crate::graph::NodeId;

/// 优先队列条目
#[derive(Debug, Clone)]
struct QueueEntry {
    key: f64,
    node: NodeId,
    seq: u64,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // 最小堆：优先级小的、节点标识小的、先入队的优先
        other
            .key
            .total_cmp(&self.key)
            .then_with(|| other.node.cmp(&self.node))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// 按优先级出队的前沿
#[derive(Debug, Clone, Default)]
pub struct PriorityFrontier {
    heap: BinaryHeap<QueueEntry>,
    seq: u64,
}

impl PriorityFrontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: NodeId, key: f64) {
        self.heap.push(QueueEntry {
            key,
            node,
            seq: self.seq,
        });
        self.seq += 1;
    }

    pub fn pop(&mut self) -> Option<(NodeId, f64)> {
        self.heap.pop().map(|entry| (entry.node, entry.key))
    }

    /// 队首优先级
    pub fn peek_key(&self) -> Option<f64> {
        self.heap.peek().map(|entry| entry.key)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// 待处理节点，按出队顺序，去掉重复项和 `keep` 拒绝的过期项
    pub fn pending<F>(&self, keep: F) -> Vec<NodeId>
    where
        F: Fn(&NodeId) -> bool,
    {
        let mut entries = self.heap.clone().into_sorted_vec();
        entries.reverse();

        let mut seen = HashSet::new();
        entries
            .into_iter()
            .filter(|entry| keep(&entry.node))
            .filter(|entry| seen.insert(entry.node.clone()))
            .map(|entry| entry.node)
            .collect()
    }
}
