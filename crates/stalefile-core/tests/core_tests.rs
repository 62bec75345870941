use stalefile_core::{
    EPOCH, IgnoreMode, NodeKind, NoopResolver, PackageId, PackageMap, PackageOwnershipResolver, ScanConfig,
    ScanTree, TreeNode, TreeStats,
};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

fn days_ago(days: u64) -> SystemTime {
    SystemTime::now() - Duration::from_secs(days * 24 * 60 * 60)
}

/// Sum of file sizes reachable from `node`, recomputed from the leaves.
fn leaf_size(node: &TreeNode) -> u64 {
    match node.kind {
        NodeKind::File => node.size,
        NodeKind::Directory => node.children.iter().map(leaf_size).sum(),
        _ => 0,
    }
}

fn check_invariants(node: &TreeNode) {
    for child in &node.children {
        assert!(node.accessed >= child.accessed, "{} older than child", node.path.display());
        for (package, accessed) in child.packages.iter() {
            assert!(node.packages.get(package).is_some_and(|t| t >= accessed));
        }
        check_invariants(child);
    }
    if node.is_dir() {
        let newest = node.children.iter().map(|c| c.accessed).max().unwrap_or(EPOCH);
        assert_eq!(node.accessed, newest);
    }
}

fn sample_tree() -> TreeNode {
    let mut owned = PackageMap::new();
    owned.record("foo", days_ago(400));

    let mut fresh_owned = PackageMap::new();
    fresh_owned.record("foo", days_ago(10));
    fresh_owned.record("bar", days_ago(10));

    let mut lib = TreeNode::new_directory("/r/lib");
    lib.push_child(TreeNode::new_file("/r/lib/a.so", 300, days_ago(400), owned));
    lib.push_child(TreeNode::new_file("/r/lib/b.so", 200, days_ago(10), fresh_owned));

    let mut root = TreeNode::new_directory("/r");
    root.push_child(lib);
    root.push_child(TreeNode::new_file("/r/notes.txt", 50, days_ago(30), PackageMap::new()));
    root.push_child(TreeNode::new_symlink("/r/link"));
    root.push_child(TreeNode::new_other("/r/fifo"));
    root.push_child(TreeNode::new_directory("/r/empty"));
    root
}

#[test]
fn test_node_kind_discrimination() {
    assert!(NodeKind::File.is_file());
    assert!(!NodeKind::File.is_dir());
    assert!(NodeKind::Directory.is_dir());
    assert!(NodeKind::Symlink.is_symlink());

    let other = NodeKind::Other;
    assert!(!other.is_file());
    assert!(!other.is_dir());
    assert!(!other.is_symlink());
}

#[test]
fn test_aggregate_size_matches_leaves() {
    let root = sample_tree();
    assert_eq!(root.size, 550);
    assert_eq!(root.size, leaf_size(&root));
    assert_eq!(root.file_count(), 3);
}

#[test]
fn test_aggregate_invariants_hold() {
    check_invariants(&sample_tree());
}

#[test]
fn test_package_map_takes_latest_access() {
    let root = sample_tree();
    let foo = root.packages.get("foo").unwrap();
    let expected = root.children[0].children[1].accessed;
    assert_eq!(foo, expected);
    assert_eq!(root.packages.len(), 2);
}

#[test]
fn test_leaves_without_content() {
    let root = sample_tree();
    let empty = root.children.iter().find(|c| c.path == Path::new("/r/empty")).unwrap();
    assert_eq!(empty.accessed, EPOCH);
    assert_eq!(empty.size, 0);
    assert!(empty.is_unowned());

    let link = root.children.iter().find(|c| c.kind.is_symlink()).unwrap();
    assert_eq!(link.accessed, EPOCH);
    assert!(link.children.is_empty());
}

#[test]
fn test_scan_config_ignore_patterns() {
    let config = ScanConfig::builder()
        .root("/srv")
        .ignore_patterns(vec![PathBuf::from("/srv/cache"), PathBuf::from("/srv/tmp")])
        .build()
        .unwrap();

    assert_eq!(config.ignore_mode, IgnoreMode::Child);
    assert!(config.should_ignore(Path::new("/srv/cache/x/y")));
    assert!(config.should_ignore(Path::new("/srv/tmp")));
    assert!(!config.should_ignore(Path::new("/srv/cached")));
}

#[test]
fn test_noop_resolver_as_trait_object() {
    let resolver: &dyn PackageOwnershipResolver = &NoopResolver;
    let owners: &[PackageId] = resolver.owners_of(Path::new("/usr/lib/libc.so.6"));
    assert!(owners.is_empty());
}

#[test]
fn test_scan_tree_serializes() {
    let tree = ScanTree::new(sample_tree(), ScanConfig::new("/r"), TreeStats::new(), Duration::ZERO, Vec::new());
    let json = serde_json::to_string(&tree).unwrap();
    assert!(json.contains("/r/lib/a.so"));
    assert!(json.contains("\"foo\""));
}
