//! Tree alignment and edit script generation
//!
//! Two passes per sibling group: exact signature matching first, then a
//! greedy similarity pass over the leftovers to catch renames and
//! parameter-list edits. A final pass over the script pairs removals with
//! additions of the same signature under a different parent and rewrites
//! them as `Moved`. All tie-breaking follows declaration order, so the
//! script is a pure function of the two input trees.

use crate::config::EngineConfig;
use crate::features::diffing::domain::similarity::{
    jaccard_similarity, normalized_levenshtein_similarity,
};
use crate::features::diffing::domain::{Change, ChangeKind, RevisionEditScript};
use crate::features::model::domain::{Entity, Signature};
use crate::shared::{Diagnostic, QualifiedPath};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Aligns two entity trees of the same logical file and returns the edit
/// script transforming `old` into `new`.
///
/// `diff(t, t)` is always empty; the script depends only on the trees and
/// the configuration, never on map iteration order.
pub fn diff(old: &Entity, new: &Entity, config: &EngineConfig) -> RevisionEditScript {
    let mut differ = Differ {
        config,
        changes: Vec::new(),
        diagnostics: Vec::new(),
    };
    if old.signature != new.signature || old.fingerprint() != new.fingerprint() {
        differ
            .changes
            .push(Change::modified(shallow(old), shallow(new)));
    }
    differ.diff_children(old, new);
    differ.rewrite_moves();
    RevisionEditScript {
        changes: differ.changes,
        diagnostics: differ.diagnostics,
    }
}

/// Script for a file appearing for the first time: every entity in the
/// tree is `Added` in one subtree change.
pub fn added_file_script(root: &Entity) -> RevisionEditScript {
    RevisionEditScript {
        changes: vec![Change::added(root.clone())],
        diagnostics: Vec::new(),
    }
}

/// Script for a deleted file: the whole tree is `Removed`.
pub fn removed_file_script(root: &Entity) -> RevisionEditScript {
    RevisionEditScript {
        changes: vec![Change::removed(root.clone())],
        diagnostics: Vec::new(),
    }
}

/// Snapshot without children, for `Modified` entries. Child changes get
/// their own script entries; duplicating the subtree would let the history
/// aggregator double-count them.
fn shallow(entity: &Entity) -> Entity {
    let mut snapshot = entity.clone();
    snapshot.children = Vec::new();
    snapshot
}

/// Clone of `entity` with every path in the subtree rebased from
/// `old_prefix` to `new_prefix`. Recursing into a renamed or moved pair
/// uses the rebased side, so nested changes carry paths consistent with
/// the new parent and the history aggregator can resolve them after
/// re-keying the subtree.
fn rebased(entity: &Entity, old_prefix: &QualifiedPath, new_prefix: &QualifiedPath) -> Entity {
    let mut subtree = entity.clone();
    rebase_paths(&mut subtree, old_prefix, new_prefix);
    subtree
}

fn rebase_paths(entity: &mut Entity, old_prefix: &QualifiedPath, new_prefix: &QualifiedPath) {
    if let Some(path) = entity.path.rebase(old_prefix, new_prefix) {
        entity.path = path;
    }
    for child in &mut entity.children {
        rebase_paths(child, old_prefix, new_prefix);
    }
}

struct Differ<'a> {
    config: &'a EngineConfig,
    changes: Vec<Change>,
    diagnostics: Vec<Diagnostic>,
}

impl Differ<'_> {
    /// Aligns the children of an already-matched pair and recurses into
    /// every aligned sub-pair.
    fn diff_children(&mut self, old: &Entity, new: &Entity) {
        let new_by_signature: FxHashMap<&Signature, usize> = new
            .children
            .iter()
            .enumerate()
            .map(|(index, child)| (&child.signature, index))
            .collect();

        let mut new_matched = vec![false; new.children.len()];
        let mut exact: Vec<(usize, usize)> = Vec::new();
        let mut old_unmatched: Vec<usize> = Vec::new();
        for (old_index, old_child) in old.children.iter().enumerate() {
            match new_by_signature.get(&old_child.signature) {
                Some(&new_index) if !new_matched[new_index] => {
                    new_matched[new_index] = true;
                    exact.push((old_index, new_index));
                }
                _ => old_unmatched.push(old_index),
            }
        }
        let new_unmatched: Vec<usize> =
            (0..new.children.len()).filter(|i| !new_matched[*i]).collect();

        let renamed = self.match_by_similarity(old, new, &old_unmatched, &new_unmatched);

        for (old_index, new_index) in exact {
            let (before, after) = (&old.children[old_index], &new.children[new_index]);
            if before.fingerprint() != after.fingerprint() {
                self.changes
                    .push(Change::modified(shallow(before), shallow(after)));
            }
            self.diff_children(before, after);
        }
        for &(old_index, new_index) in &renamed {
            let (before, after) = (&old.children[old_index], &new.children[new_index]);
            self.changes
                .push(Change::modified(shallow(before), shallow(after)));
            let relocated = rebased(before, &before.path, &after.path);
            self.diff_children(&relocated, after);
        }

        for old_index in old_unmatched {
            if renamed.iter().all(|&(o, _)| o != old_index) {
                self.changes
                    .push(Change::removed(old.children[old_index].clone()));
            }
        }
        for new_index in new_unmatched {
            if renamed.iter().all(|&(_, n)| n != new_index) {
                self.changes
                    .push(Change::added(new.children[new_index].clone()));
            }
        }
    }

    /// Greedy best-score matching over the unmatched children of one
    /// sibling group. Candidates below the threshold are never paired.
    fn match_by_similarity(
        &mut self,
        old: &Entity,
        new: &Entity,
        old_unmatched: &[usize],
        new_unmatched: &[usize],
    ) -> Vec<(usize, usize)> {
        if old_unmatched.is_empty() || new_unmatched.is_empty() {
            return Vec::new();
        }

        let mut candidates: Vec<(f64, usize, usize)> = Vec::new();
        for &old_index in old_unmatched {
            for &new_index in new_unmatched {
                let (before, after) = (&old.children[old_index], &new.children[new_index]);
                if before.kind != after.kind {
                    continue;
                }
                let score = self.score(before, after);
                if score >= self.config.similarity_threshold {
                    candidates.push((score, old_index, new_index));
                }
            }
        }
        candidates.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(Ordering::Equal)
                .then(a.1.cmp(&b.1))
                .then(a.2.cmp(&b.2))
        });

        let mut old_free: HashSet<usize> = old_unmatched.iter().copied().collect();
        let mut new_free: HashSet<usize> = new_unmatched.iter().copied().collect();
        let mut pairs = Vec::new();
        for (position, &(score, old_index, new_index)) in candidates.iter().enumerate() {
            if !old_free.contains(&old_index) || !new_free.contains(&new_index) {
                continue;
            }
            let ambiguous = candidates[position + 1..].iter().any(|&(s, o, n)| {
                s == score
                    && (o == old_index) != (n == new_index)
                    && old_free.contains(&o)
                    && new_free.contains(&n)
            });
            if ambiguous {
                let path = &old.children[old_index].path;
                self.diagnostics.push(Diagnostic::warning(
                    path.source_file(),
                    format!(
                        "ambiguous rename candidates for {}; matched by declaration order",
                        path
                    ),
                ));
            }
            old_free.remove(&old_index);
            new_free.remove(&new_index);
            pairs.push((old_index, new_index));
        }
        pairs
    }

    /// Combined similarity score in [0.0, 1.0]. The parameter component
    /// only applies to methods and the child component only to containers;
    /// unused weights are dropped from the normalization.
    fn score(&self, before: &Entity, after: &Entity) -> f64 {
        let config = self.config;
        let mut score = config.name_weight
            * normalized_levenshtein_similarity(&before.name, &after.name);
        let mut total = config.name_weight;

        if !before.signature.param_types.is_empty() || !after.signature.param_types.is_empty() {
            let left: HashSet<&str> = before
                .signature
                .param_types
                .iter()
                .map(String::as_str)
                .collect();
            let right: HashSet<&str> = after
                .signature
                .param_types
                .iter()
                .map(String::as_str)
                .collect();
            score += config.param_weight * jaccard_similarity(&left, &right);
            total += config.param_weight;
        }
        if before.kind.is_container() {
            let left: HashSet<String> = before
                .children
                .iter()
                .map(|c| c.signature.render())
                .collect();
            let right: HashSet<String> =
                after.children.iter().map(|c| c.signature.render()).collect();
            score += config.child_weight * jaccard_similarity(&left, &right);
            total += config.child_weight;
        }
        if total <= 0.0 {
            return 0.0;
        }
        score / total
    }

    /// Pairs each `Removed` entry with the first `Added` entry carrying the
    /// same signature under a different parent and rewrites the pair as one
    /// `Moved` change, then diffs the relocated subtrees in place.
    fn rewrite_moves(&mut self) {
        let mut consumed_added: Vec<usize> = Vec::new();
        let mut moved_pairs: Vec<(Entity, Entity)> = Vec::new();

        for removed_index in 0..self.changes.len() {
            if self.changes[removed_index].kind != ChangeKind::Removed {
                continue;
            }
            let Some(before) = self.changes[removed_index].before.clone() else {
                continue;
            };
            let matched = self.changes.iter().enumerate().find(|(index, change)| {
                change.kind == ChangeKind::Added
                    && !consumed_added.contains(index)
                    && change.after.as_ref().is_some_and(|after| {
                        after.signature == before.signature
                            && after.path.parent() != before.path.parent()
                    })
            });
            let Some((added_index, _)) = matched else {
                continue;
            };
            let Some(after) = self.changes[added_index].after.clone() else {
                continue;
            };
            consumed_added.push(added_index);
            self.changes[removed_index] = Change::moved(before.clone(), after.clone());
            moved_pairs.push((before, after));
        }

        consumed_added.sort_unstable();
        for index in consumed_added.into_iter().rev() {
            self.changes.remove(index);
        }

        for (before, after) in moved_pairs {
            let relocated = rebased(&before, &before.path, &after.path);
            if relocated.fingerprint() != after.fingerprint() {
                self.changes
                    .push(Change::modified(shallow(&relocated), shallow(&after)));
            }
            self.diff_children(&relocated, &after);
        }
    }
}
