//! Cross-type entity mappers.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use resauth_core::{AuthzError, AuthzResult};

/// Translates one entity into the related entities of another type, so an
/// authorization decision made about one type can cascade onto a structurally
/// related one (e.g. authorizing a workflow task via the business document it
/// belongs to).
///
/// `map_to` may return zero, one or many related entities. The cascading rule
/// — typically "every mapped entity must independently pass" — belongs to the
/// caller, not the mapper.
pub trait EntityMapper<F, T>: Send + Sync {
    fn map_to(&self, from: &F) -> Vec<T>;
}

/// Registry of mappers keyed by `(from, to)` type pair.
///
/// In the source design mappers declared `supports(from, to)`; here the type
/// pair is the registration key, so support is exact and checked at lookup.
#[derive(Default)]
pub struct MapperRegistry {
    mappers: HashMap<(TypeId, TypeId), Box<dyn Any + Send + Sync>>,
}

impl MapperRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F: 'static, T: 'static>(&mut self, mapper: Arc<dyn EntityMapper<F, T>>) {
        self.mappers
            .insert((TypeId::of::<F>(), TypeId::of::<T>()), Box::new(mapper));
    }

    pub fn get<F: 'static, T: 'static>(&self) -> AuthzResult<Arc<dyn EntityMapper<F, T>>> {
        self.mappers
            .get(&(TypeId::of::<F>(), TypeId::of::<T>()))
            .and_then(|entry| entry.downcast_ref::<Arc<dyn EntityMapper<F, T>>>())
            .cloned()
            .ok_or_else(|| {
                AuthzError::resource_not_supported(format!(
                    "no entity mapper registered for {} -> {}",
                    std::any::type_name::<F>(),
                    std::any::type_name::<T>(),
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Task {
        document_ids: Vec<u32>,
    }

    #[derive(Debug, PartialEq)]
    struct Document {
        id: u32,
    }

    struct TaskDocuments;

    impl EntityMapper<Task, Document> for TaskDocuments {
        fn map_to(&self, from: &Task) -> Vec<Document> {
            from.document_ids.iter().map(|id| Document { id: *id }).collect()
        }
    }

    #[test]
    fn registered_mapper_is_resolved_by_type_pair() {
        let mut registry = MapperRegistry::new();
        registry.register::<Task, Document>(Arc::new(TaskDocuments));

        let mapper = registry.get::<Task, Document>().unwrap();
        let task = Task {
            document_ids: vec![1, 2],
        };
        assert_eq!(
            mapper.map_to(&task),
            vec![Document { id: 1 }, Document { id: 2 }]
        );
    }

    #[test]
    fn missing_mapper_is_resource_not_supported() {
        let registry = MapperRegistry::new();
        match registry.get::<Task, Document>() {
            Err(AuthzError::ResourceNotSupported(msg)) if msg.contains("no entity mapper") => {}
            Err(other) => panic!("expected ResourceNotSupported, got {other:?}"),
            Ok(_) => panic!("expected ResourceNotSupported, got a mapper"),
        }
    }

    #[test]
    fn mapper_may_return_no_related_entities() {
        let mut registry = MapperRegistry::new();
        registry.register::<Task, Document>(Arc::new(TaskDocuments));

        let mapper = registry.get::<Task, Document>().unwrap();
        assert!(mapper
            .map_to(&Task {
                document_ids: vec![]
            })
            .is_empty());
    }
}
