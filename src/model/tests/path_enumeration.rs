//! Integration tests for binding path enumeration

use gatekeep_model::{Model, PathEnumerator, PathFinder, RelationshipKind, Shape, ShapeId};
use proptest::prelude::*;

fn id(raw: &str) -> ShapeId {
    raw.parse().unwrap()
}

/// Service binding `width` resources per level, `depth` levels deep, each
/// leaf resource binding `ops` operations
fn layered(width: usize, depth: usize, ops: usize) -> Model {
    let mut shapes = Vec::new();
    let mut service = Shape::service(id("gen#Svc"));
    for w in 0..width {
        service = service.with_relationship(RelationshipKind::Resource, id(&format!("gen#L0W{}", w)));
    }
    shapes.push(service);

    for d in 0..depth {
        for w in 0..width {
            let mut resource = Shape::resource(id(&format!("gen#L{}W{}", d, w)));
            if d + 1 < depth {
                for next in 0..width {
                    resource = resource
                        .with_relationship(RelationshipKind::Resource, id(&format!("gen#L{}W{}", d + 1, next)));
                }
            } else {
                for o in 0..ops {
                    resource = resource.with_relationship(RelationshipKind::Operation, id(&format!("gen#Op{}", o)));
                }
            }
            shapes.push(resource);
        }
    }
    for o in 0..ops {
        shapes.push(Shape::operation(id(&format!("gen#Op{}", o))));
    }

    let mut builder = Model::builder();
    builder.add_shapes(shapes).unwrap();
    builder.build().unwrap()
}

#[test]
fn test_paths_end_at_operations_and_start_at_root() {
    let model = layered(2, 2, 3);
    let finder = PathFinder::new(&model).unwrap();

    let paths = finder.search(&id("gen#Svc"), &|s: &Shape| s.is_operation()).unwrap();
    assert_eq!(paths.len(), 2 * 2 * 3);
    for path in &paths {
        assert_eq!(path.root(), Some(&id("gen#Svc")));
        assert!(path.target().unwrap().name().starts_with("Op"));
        assert_eq!(path.len(), 4);
    }
}

#[test]
fn test_search_is_deterministic() {
    let model = layered(3, 2, 2);
    let finder = PathFinder::new(&model).unwrap();
    let target = |s: &Shape| s.is_operation();

    let first = finder.search(&id("gen#Svc"), &target).unwrap();
    let second = PathFinder::new(&model)
        .unwrap()
        .search(&id("gen#Svc"), &target)
        .unwrap();
    assert_eq!(first, second);
}

proptest! {
    #[test]
    fn test_path_count_matches_layout(width in 1usize..4, depth in 1usize..4, ops in 0usize..4) {
        let model = layered(width, depth, ops);
        let finder = PathFinder::new(&model).unwrap();

        let paths = finder.search(&id("gen#Svc"), &|s: &Shape| s.is_operation()).unwrap();
        prop_assert_eq!(paths.len(), width.pow(depth as u32) * ops);
        prop_assert!(paths.iter().all(|p| p.len() == depth + 2));
    }
}
