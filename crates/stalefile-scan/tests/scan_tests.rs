use std::collections::HashMap;
use std::fs::{self, File, FileTimes};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use stalefile_core::{EPOCH, NodeKind, PackageId, PackageOwnershipResolver};
use stalefile_scan::{IgnoreMode, ScanConfig, TreeBuilder, TreeNode};
use tempfile::TempDir;

/// Resolver backed by a fixed path table.
#[derive(Default)]
struct TableResolver {
    table: HashMap<PathBuf, Vec<PackageId>>,
}

impl TableResolver {
    fn own(&mut self, path: &Path, package: &str) {
        self.table.entry(path.to_path_buf()).or_default().push(package.into());
    }
}

impl PackageOwnershipResolver for TableResolver {
    fn owners_of(&self, path: &Path) -> &[PackageId] {
        self.table.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    fn name(&self) -> &str {
        "table"
    }
}

fn days_ago(days: u64) -> SystemTime {
    SystemTime::now() - Duration::from_secs(days * 24 * 60 * 60)
}

fn write_file(path: &Path, len: usize, accessed: SystemTime) {
    fs::write(path, vec![b'x'; len]).unwrap();
    let file = File::options().write(true).open(path).unwrap();
    file.set_times(FileTimes::new().set_accessed(accessed)).unwrap();
}

fn find<'t>(node: &'t TreeNode, path: &Path) -> Option<&'t TreeNode> {
    if node.path == path {
        return Some(node);
    }
    node.children.iter().find_map(|c| find(c, path))
}

fn leaf_size(node: &TreeNode) -> u64 {
    match node.kind {
        NodeKind::File => node.size,
        NodeKind::Directory => node.children.iter().map(leaf_size).sum(),
        _ => 0,
    }
}

fn assert_monotonic(node: &TreeNode) {
    for c in &node.children {
        assert!(node.accessed >= c.accessed);
        assert_monotonic(c);
    }
}

#[test]
fn test_package_attribution_keeps_latest_access() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("a");
    fs::create_dir(&root).unwrap();
    let recent = root.join("recent.bin");
    let old = root.join("old.bin");
    write_file(&recent, 10, days_ago(10));
    write_file(&old, 10, days_ago(400));

    let mut resolver = TableResolver::default();
    resolver.own(&recent, "foo");
    resolver.own(&old, "foo");
    resolver.own(&old, "bar");

    let tree = TreeBuilder::new().build(&resolver, &ScanConfig::new(&root)).unwrap();

    let foo = tree.root.packages.get("foo").unwrap();
    let bar = tree.root.packages.get("bar").unwrap();
    assert_eq!(foo, find(&tree.root, &recent).unwrap().accessed);
    assert_eq!(bar, find(&tree.root, &old).unwrap().accessed);
    assert!(foo > bar);
}

#[test]
fn test_aggregation_properties() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("x/y/z")).unwrap();
    fs::create_dir(root.join("empty")).unwrap();
    write_file(&root.join("x/one"), 100, days_ago(3));
    write_file(&root.join("x/y/two"), 250, days_ago(50));
    write_file(&root.join("x/y/z/three"), 7, days_ago(900));

    let tree = TreeBuilder::new().build(&TableResolver::default(), &ScanConfig::new(root)).unwrap();

    assert_eq!(tree.root.size, 357);
    assert_eq!(tree.root.size, leaf_size(&tree.root));
    assert_monotonic(&tree.root);

    let empty = find(&tree.root, &root.join("empty")).unwrap();
    assert_eq!(empty.accessed, EPOCH);
    assert!(tree.root.packages.is_empty());
}

#[cfg(unix)]
#[test]
fn test_symlink_to_large_tree_contributes_nothing() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("target");
    let scanned = temp.path().join("scanned");
    fs::create_dir(&target).unwrap();
    fs::create_dir(&scanned).unwrap();
    let big = target.join("big");
    write_file(&big, 4096, days_ago(1));
    std::os::unix::fs::symlink(&target, scanned.join("link")).unwrap();
    std::os::unix::fs::symlink(&big, scanned.join("file-link")).unwrap();

    let mut resolver = TableResolver::default();
    resolver.own(&big, "huge");

    let tree = TreeBuilder::new().build(&resolver, &ScanConfig::new(&scanned)).unwrap();

    assert_eq!(tree.root.size, 0);
    assert_eq!(tree.root.accessed, EPOCH);
    assert!(tree.root.packages.is_empty());
    assert!(tree.root.children.iter().all(|c| c.kind.is_symlink()));
}

#[test]
fn test_ignored_directory_contributes_nothing_in_either_mode() {
    for mode in [IgnoreMode::Child, IgnoreMode::Parent] {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let ignored = root.join("ignored");
        fs::create_dir(&ignored).unwrap();
        write_file(&ignored.join("data"), 1000, days_ago(1));
        write_file(&root.join("kept"), 10, days_ago(500));

        let mut resolver = TableResolver::default();
        resolver.own(&ignored.join("data"), "pkg");

        let config = ScanConfig::builder()
            .root(root)
            .ignore_patterns(vec![ignored.clone()])
            .ignore_mode(mode)
            .build()
            .unwrap();
        let tree = TreeBuilder::new().build(&resolver, &config).unwrap();

        assert_eq!(tree.root.size, 10, "{mode:?}");
        assert!(tree.root.packages.is_empty(), "{mode:?}");
        assert_eq!(find(&tree.root, &ignored).is_some(), mode == IgnoreMode::Parent);
    }
}

#[cfg(unix)]
#[test]
fn test_fifo_is_an_empty_leaf() {
    use std::process::Command;

    let temp = TempDir::new().unwrap();
    let fifo = temp.path().join("pipe");
    let made = Command::new("mkfifo").arg(&fifo).status().map(|s| s.success()).unwrap_or(false);
    if !made {
        return;
    }

    let tree = TreeBuilder::new().build(&TableResolver::default(), &ScanConfig::new(temp.path())).unwrap();

    let node = find(&tree.root, &fifo).unwrap();
    assert_eq!(node.kind, NodeKind::Other);
    assert_eq!(node.size, 0);
    assert_eq!(tree.stats.total_other, 1);
}
