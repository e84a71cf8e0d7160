//! Entity registry owning every live entity in the world.
//!
//! Destruction is deferred: [`EntityRegistry::destroy`] only marks an entity,
//! hiding it from lookups and queries, and [`EntityRegistry::flush`] removes
//! marked entities once the current resolution step is done. Queries return
//! an owned snapshot of identifiers so callers may destroy entities while
//! walking the result without disturbing the registry.

use hashbrown::{HashMap, HashSet};
use log::trace;

use crate::components::{EntityKind, Kind};
use crate::entity::{Attributes, Entity, EntityId};

/// Owns every entity and hands out identifiers.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: HashMap<EntityId, Entity>,
    doomed: HashSet<EntityId>,
    next_id: u64,
}

impl EntityRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new entity and returns its freshly assigned identifier.
    ///
    /// # Examples
    /// ```
    /// use glam::Vec2;
    /// use skirmish::components::{EntityKind, Kind};
    /// use skirmish::entity::Attributes;
    /// use skirmish::registry::EntityRegistry;
    ///
    /// let mut registry = EntityRegistry::new();
    /// let id = registry.spawn(EntityKind::Player, Attributes::at(Vec2::new(1.0, 2.0)));
    /// assert_eq!(registry.get(id).map(|e| e.tag()), Some(Kind::Player));
    /// ```
    pub fn spawn(&mut self, kind: EntityKind, attrs: Attributes) -> EntityId {
        self.next_id += 1;
        let id = EntityId(self.next_id);
        trace!("spawn {id} as {:?}", kind.kind());
        self.entities.insert(id, Entity::new(id, kind, attrs));
        id
    }

    /// Marks `id` for removal at the next [`flush`](Self::flush).
    ///
    /// Unknown or already marked identifiers are ignored.
    pub fn destroy(&mut self, id: EntityId) {
        if self.entities.contains_key(&id) && self.doomed.insert(id) {
            trace!("destroy {id} queued");
        }
    }

    /// Removes every entity marked by [`destroy`](Self::destroy) and returns
    /// how many were removed.
    pub fn flush(&mut self) -> usize {
        let removed = self.doomed.len();
        for id in self.doomed.drain() {
            self.entities.remove(&id);
        }
        removed
    }

    /// Looks up a live entity. Entities awaiting removal are not returned.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        if self.doomed.contains(&id) {
            return None;
        }
        self.entities.get(&id)
    }

    /// Mutable counterpart of [`get`](Self::get).
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        if self.doomed.contains(&id) {
            return None;
        }
        self.entities.get_mut(&id)
    }

    /// Whether `id` names a live entity.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Snapshot of the identifiers of every live entity of `kind`, in spawn
    /// order.
    #[must_use]
    pub fn query(&self, kind: Kind) -> Query {
        self.select(|entity| entity.tag() == kind)
    }

    /// Snapshot of every live hostile and boss, in spawn order.
    #[must_use]
    pub fn enemies(&self) -> Query {
        self.select(|entity| entity.tag().is_enemy())
    }

    fn select(&self, keep: impl Fn(&Entity) -> bool) -> Query {
        let mut ids: Vec<EntityId> = self
            .iter()
            .filter(|entity| keep(entity))
            .map(|entity| entity.id)
            .collect();
        ids.sort_unstable();
        Query { ids }
    }

    /// Iterates over every live entity in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities
            .values()
            .filter(|entity| !self.doomed.contains(&entity.id))
    }

    /// Number of live entities of `kind`.
    #[must_use]
    pub fn count(&self, kind: Kind) -> usize {
        self.iter().filter(|entity| entity.tag() == kind).count()
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len() - self.doomed.len()
    }

    /// Whether no live entity remains.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replaces the payload of `id`, e.g. turning a slain enemy into a corpse.
    pub fn convert(&mut self, id: EntityId, kind: EntityKind) {
        if let Some(entity) = self.get_mut(id) {
            entity.kind = kind;
        }
    }
}

/// Identifiers captured by [`EntityRegistry::query`] at call time.
///
/// Iterating the same query twice yields the same sequence; entities spawned
/// or destroyed afterwards do not change it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    ids: Vec<EntityId>,
}

impl Query {
    /// Iterates over the captured identifiers in spawn order.
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, EntityId>> {
        self.ids.iter().copied()
    }

    /// Number of captured identifiers.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the query matched nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl IntoIterator for Query {
    type Item = EntityId;
    type IntoIter = std::vec::IntoIter<EntityId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.into_iter()
    }
}

impl<'a> IntoIterator for &'a Query {
    type Item = EntityId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, EntityId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use rstest::{fixture, rstest};

    fn hostile() -> EntityKind {
        EntityKind::Hostile {
            type_name: "Skeleton".to_owned(),
        }
    }

    #[fixture]
    fn registry() -> EntityRegistry {
        let mut registry = EntityRegistry::new();
        registry.spawn(EntityKind::Player, Attributes::at(Vec2::ZERO));
        for x in 0..3_u8 {
            let position = Vec2::new(f32::from(x) * 10.0, 0.0);
            registry.spawn(hostile(), Attributes::at(position).with_health(10));
        }
        registry
    }

    #[rstest]
    fn identifiers_are_unique(mut registry: EntityRegistry) {
        let a = registry.spawn(EntityKind::Boss, Attributes::default());
        let b = registry.spawn(EntityKind::Boss, Attributes::default());
        assert_ne!(a, b);
        assert_eq!(registry.len(), 6);
    }

    #[rstest]
    fn query_is_a_restartable_snapshot(mut registry: EntityRegistry) {
        let query = registry.query(Kind::Hostile);
        let first: Vec<_> = query.iter().collect();
        registry.spawn(hostile(), Attributes::default());
        let second: Vec<_> = query.iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        assert!(first.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[rstest]
    fn destroying_while_iterating_is_deferred(mut registry: EntityRegistry) {
        let query = registry.query(Kind::Hostile);
        let mut visited = 0;
        for id in &query {
            registry.destroy(id);
            visited += 1;
            assert!(registry.get(id).is_none());
        }
        assert_eq!(visited, 3);
        assert_eq!(registry.count(Kind::Hostile), 0);
        assert_eq!(registry.flush(), 3);
        assert_eq!(registry.len(), 1);
    }

    #[rstest]
    fn destroy_unknown_or_twice_is_a_no_op(mut registry: EntityRegistry) {
        registry.destroy(EntityId(999));
        let id = registry.query(Kind::Player).iter().next().expect("player");
        registry.destroy(id);
        registry.destroy(id);
        assert_eq!(registry.flush(), 1);
        assert_eq!(registry.flush(), 0);
        assert!(!registry.contains(id));
    }

    #[rstest]
    fn convert_moves_entity_between_queries(mut registry: EntityRegistry) {
        let id = registry.query(Kind::Hostile).iter().next().expect("hostile");
        registry.convert(id, EntityKind::Corpse { boss: false });
        assert_eq!(registry.count(Kind::Hostile), 2);
        assert_eq!(registry.query(Kind::Corpse).len(), 1);
        assert_eq!(registry.enemies().len(), 2);
    }
}
