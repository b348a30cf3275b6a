use std::sync::Arc;
use std::thread;

use jsonpath_dom::{query, CacheStats, PathCache, DEFAULT_CACHE_SIZE};

#[test]
fn same_path_same_instance() {
    let cache = PathCache::new(16);
    let a = cache.compile("$.a.b").unwrap();
    let b = cache.compile("$.a.b").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(cache.stats(), CacheStats { size: 1, max_size: 16 });

    // equal paths with different text are cached separately
    let c = cache.compile("$['a']['b']").unwrap();
    assert!(!Arc::ptr_eq(&a, &c));
    assert_eq!(a.segments(), c.segments());
    assert_eq!(cache.stats().size, 2);
}

#[test]
fn invalid_paths_are_not_cached() {
    let cache = PathCache::default();
    assert_eq!(cache.stats().max_size, DEFAULT_CACHE_SIZE);
    cache.compile("$[").unwrap_err();
    cache.compile("$[").unwrap_err();
    assert_eq!(cache.stats().size, 0);
}

#[test]
fn evicts_oldest() {
    let cache = PathCache::new(2);
    let a = cache.compile("$.a").unwrap();
    let b = cache.compile("$.b").unwrap();
    cache.compile("$.c").unwrap();
    assert_eq!(cache.stats().size, 2);

    // `$.a` was evicted, `$.b` was kept
    assert!(Arc::ptr_eq(&b, &cache.compile("$.b").unwrap()));
    assert!(!Arc::ptr_eq(&a, &cache.compile("$.a").unwrap()));
    assert_eq!(cache.stats().size, 2);
}

#[test]
fn resize_and_clear() {
    let cache = PathCache::new(4);
    for path in ["$.a", "$.b", "$.c"] {
        cache.compile(path).unwrap();
    }

    // shrinking applies from the next insertion
    cache.set_max_size(1);
    assert_eq!(cache.stats(), CacheStats { size: 3, max_size: 1 });
    cache.compile("$.d").unwrap();
    assert_eq!(cache.stats().size, 1);

    // zero disables caching
    cache.set_max_size(0);
    cache.clear();
    let a = cache.compile("$.a").unwrap();
    let b = cache.compile("$.a").unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(cache.stats(), CacheStats { size: 0, max_size: 0 });
}

#[test]
fn concurrent_compile() {
    let cache = PathCache::new(1000);
    let paths: Vec<String> = (0..50).map(|i| format!("$.items[{i}].name")).collect();

    let results: Vec<Vec<_>> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(|| {
                    paths
                        .iter()
                        .map(|path| cache.compile(path).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(cache.stats().size, paths.len());
    for compiled in &results[1..] {
        for (a, b) in results[0].iter().zip(compiled) {
            assert!(Arc::ptr_eq(a, b));
        }
    }
}

#[test]
fn global_cache() {
    let a = query::compile("$.global.cache.test").unwrap();
    let b = query::compile("$.global.cache.test").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert!(query::cache_stats().size >= 1);

    query::set_cache_max_size(10);
    assert_eq!(query::cache_stats().max_size, 10);
    query::clear_cache();
    assert_eq!(query::cache_stats().size, 0);
    query::set_cache_max_size(DEFAULT_CACHE_SIZE);
}
