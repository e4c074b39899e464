//! Handle binding and reassignment
//!
//! Reading leaves pointers holding raw handles; [`bind_pointers`] resolves
//! them against the items present. Writing discards every handle and
//! [`assign_handles`] numbers the graph afresh. Both walks keep a visited
//! set, so cyclic graphs (a dictionary containing itself) terminate.

use ahash::{AHashMap, AHashSet};

use crate::io::dxf::{is_handle_code, CodePair, CodePairValue};
use crate::item::{Item, ItemArena, ItemId};
use crate::types::Handle;

/// Previous handle to new handle for every item renumbered by
/// [`assign_handles_with_map`].
pub type HandleMap = AHashMap<Handle, Handle>;

/// Outcome of a bind pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindReport {
    /// Pointer handles that matched no item; those pointers stay unbound.
    pub dangling: Vec<Handle>,
    /// Handles carried by more than one item; the last one read wins.
    pub duplicates: Vec<Handle>,
}

/// Whether `owner` may take ownership of `target` through a pointer or as
/// a structural parent. Entities are only ever owned by dictionaries.
fn can_own(arena: &ItemArena, owner: ItemId, target: ItemId) -> bool {
    !arena[target].is_entity() || arena[owner].is_dictionary()
}

/// Resolve every pointer reachable from `roots` and record owner links.
pub fn bind_pointers(arena: &mut ItemArena, roots: &[ItemId]) -> BindReport {
    let mut report = BindReport::default();
    let mut by_handle = AHashMap::new();
    let mut visited = AHashSet::new();
    for &root in roots {
        gather_handles(arena, root, &mut by_handle, &mut visited, &mut report);
    }

    let mut visited = AHashSet::new();
    for &root in roots {
        bind_item(arena, root, &by_handle, &mut visited, &mut report);
    }
    report
}

fn gather_handles(
    arena: &ItemArena,
    id: ItemId,
    by_handle: &mut AHashMap<Handle, ItemId>,
    visited: &mut AHashSet<ItemId>,
    report: &mut BindReport,
) {
    if !visited.insert(id) {
        return;
    }
    let item = &arena[id];
    let handle = item.handle();
    if handle.is_valid() {
        if let Some(previous) = by_handle.insert(handle, id) {
            if previous != id {
                tracing::warn!(handle = %handle, "duplicate handle");
                report.duplicates.push(handle);
            }
        }
    }
    for child in item.child_items() {
        gather_handles(arena, child, by_handle, visited, report);
    }
}

fn bind_item(
    arena: &mut ItemArena,
    id: ItemId,
    by_handle: &AHashMap<Handle, ItemId>,
    visited: &mut AHashSet<ItemId>,
    report: &mut BindReport,
) {
    if !visited.insert(id) {
        return;
    }

    let children = arena[id].child_items();
    for &child in &children {
        arena.set_owner(child, id);
    }

    let targets: Vec<(Handle, Option<ItemId>)> = arena[id]
        .pointers()
        .iter()
        .map(|p| (p.handle, p.item))
        .collect();
    for (index, (handle, bound)) in targets.into_iter().enumerate() {
        let target = by_handle.get(&handle).copied().or(bound);
        let Some(target) = target else {
            if handle.is_valid() {
                tracing::debug!(handle = %handle, "pointer target not found");
                report.dangling.push(handle);
            }
            continue;
        };
        if let Some(pointer) = arena[id].pointers_mut().into_iter().nth(index) {
            pointer.item = Some(target);
        }
        bind_item(arena, target, by_handle, visited, report);
        if can_own(arena, id, target) {
            arena.set_owner(target, id);
        }
    }

    for child in children {
        bind_item(arena, child, by_handle, visited, report);
    }
}

/// Give every item reachable from `roots` a fresh handle, numbered from 1 in
/// depth-first preorder, and rewrite owner handles and pointer handles to
/// match. Returns the next unused handle.
pub fn assign_handles(arena: &mut ItemArena, roots: &[ItemId]) -> Handle {
    assign_handles_with_map(arena, roots).0
}

/// [`assign_handles`], also returning how the previous handles map onto the
/// new ones. Handle-valued pairs kept in `102` groups and XDATA are
/// rewritten through that map; those naming no item become NULL.
pub fn assign_handles_with_map(arena: &mut ItemArena, roots: &[ItemId]) -> (Handle, HandleMap) {
    let mut visited = AHashSet::new();
    let mut previous = AHashMap::new();
    for &root in roots {
        clear_handles(arena, root, &mut visited, &mut previous);
    }

    let mut next = 1u64;
    let mut order = Vec::new();
    let mut visited = AHashSet::new();
    for &root in roots {
        assign_item(arena, root, None, &mut next, &mut visited, &mut order);
    }

    // Items first reached structurally before their owner was numbered
    // still need the owner's handle.
    for &id in &order {
        if arena[id].owner_handle().is_valid() {
            continue;
        }
        if let Some(owner) = arena.owner(id) {
            if can_own(arena, owner, id) {
                let handle = arena[owner].handle();
                arena[id].set_owner_handle(handle);
            }
        }
    }

    let map: HandleMap = previous
        .into_iter()
        .map(|(old, id)| (old, arena[id].handle()))
        .collect();
    for &id in &order {
        arena[id].extras_mut().remap_handles(&map);
    }
    (Handle::new(next), map)
}

/// The new handle for `handle`; NULL when it named no renumbered item.
pub(crate) fn remap_handle(handle: Handle, map: &HandleMap) -> Handle {
    map.get(&handle).copied().unwrap_or(Handle::NULL)
}

/// Rewrite `pair` through `map` when its code carries a handle.
pub(crate) fn remap_handle_pair(pair: &mut CodePair, map: &HandleMap) {
    if !is_handle_code(pair.code) {
        return;
    }
    let old = pair.handle_value();
    if old.is_valid() {
        pair.value = CodePairValue::Str(remap_handle(old, map).to_hex());
    }
}

fn clear_handles(
    arena: &mut ItemArena,
    id: ItemId,
    visited: &mut AHashSet<ItemId>,
    previous: &mut AHashMap<Handle, ItemId>,
) {
    if !visited.insert(id) {
        return;
    }
    let old = arena[id].handle();
    if old.is_valid() {
        previous.insert(old, id);
    }
    arena[id].set_handle(Handle::NULL);
    arena[id].set_owner_handle(Handle::NULL);
    let targets: Vec<ItemId> = arena[id].pointers().iter().filter_map(|p| p.item).collect();
    for child in arena[id].child_items().into_iter().chain(targets) {
        clear_handles(arena, child, visited, previous);
    }
}

fn assign_item(
    arena: &mut ItemArena,
    id: ItemId,
    parent: Option<ItemId>,
    next: &mut u64,
    visited: &mut AHashSet<ItemId>,
    order: &mut Vec<ItemId>,
) {
    if !visited.insert(id) {
        return;
    }
    order.push(id);
    arena[id].set_handle(Handle::new(*next));
    *next += 1;

    if let Some(parent) = parent {
        if can_own(arena, parent, id) {
            arena.set_owner(id, parent);
        } else {
            arena.set_owner_link(id, Some(parent));
        }
    }

    for child in arena[id].child_items() {
        assign_item(arena, child, Some(id), next, visited, order);
    }

    let targets: Vec<Option<ItemId>> = arena[id].pointers().iter().map(|p| p.item).collect();
    for (index, target) in targets.into_iter().enumerate() {
        let handle = match target {
            Some(target) => {
                if visited.contains(&target) {
                    if arena.owner(target) == Some(id) && can_own(arena, id, target) {
                        let owner_handle = arena[id].handle();
                        arena[target].set_owner_handle(owner_handle);
                    }
                } else {
                    assign_item(arena, target, Some(id), next, visited, order);
                }
                arena[target].handle()
            }
            None => Handle::NULL,
        };
        if let Some(pointer) = arena[id].pointers_mut().into_iter().nth(index) {
            pointer.handle = handle;
        }
    }
}
