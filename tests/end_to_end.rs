//! Full-pipeline flows driven through the public dispatcher API.

use std::fs;
use std::sync::Arc;

use trovesh::commands::built_in_commands;
use trovesh::context::Context;
use trovesh::dispatcher::Dispatcher;
use trovesh::script::{FileScriptLocator, NullScriptLocator};
use trovesh::store::memory::sample_repository;

fn session() -> (Context, Dispatcher) {
    let ctx = Context::new(Arc::new(sample_repository()), "master").unwrap();
    (ctx, Dispatcher::new(Box::new(NullScriptLocator)))
}

/// Seeds a node named Bebhionn and moves the session onto it.
fn session_on_bebhionn() -> (Context, Dispatcher) {
    let (mut ctx, mut shell) = session();
    assert!(shell.execute(&mut ctx, "cd /content/home").is_success());
    assert!(
        shell
            .execute(&mut ctx, "create -t template Bebhionn")
            .is_success()
    );
    assert!(shell.execute(&mut ctx, "cd Bebhionn").is_success());
    (ctx, shell)
}

#[test]
fn name_rewrite_via_subinvocation() {
    let (mut ctx, mut shell) = session_on_bebhionn();
    let res = shell.execute(&mut ctx, "replace < (ga -a name) B c -c");
    assert!(res.is_success(), "{res}");
    assert_eq!(res.message, "cebhionn");
}

#[test]
fn name_rewrite_via_nested_subinvocation() {
    let (mut ctx, mut shell) = session_on_bebhionn();
    let res = shell.execute(&mut ctx, "echo < (replace < (ga -a name) B c -c)");
    assert_eq!(res.message, "cebhionn");
}

#[test]
fn name_rewrite_via_chaining() {
    let (mut ctx, mut shell) = session_on_bebhionn();
    let res = shell.execute(&mut ctx, "ga -a name > replace $~$ B c -c");
    assert_eq!(res.message, "cebhionn");
}

#[test]
fn variables_flow_into_dispatch() {
    let (mut ctx, mut shell) = session();
    assert!(shell.execute(&mut ctx, "set who world").is_success());
    assert_eq!(shell.execute(&mut ctx, "echo $who$ peace").message, "world peace");
    assert_eq!(shell.execute(&mut ctx, "if ($who$ = world) (echo yes)").message, "yes");
}

#[test]
fn scripts_drive_the_whole_session() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("setup.tsh"),
        "^desc:Creates a section under home\ncd /content/home\ncreate -t template $1$\ncd $1$\nga -a name\n",
    )
    .unwrap();
    let mut ctx = Context::new(Arc::new(sample_repository()), "master").unwrap();
    let mut shell = Dispatcher::new(Box::new(FileScriptLocator::new(dir.path())));

    let res = shell.execute(&mut ctx, "setup Docs");
    assert!(res.is_success(), "{res}");
    assert!(res.message.ends_with("Docs"));
    // the script's moves persist in the session
    assert_eq!(ctx.current_path(), "/content/home/Docs");
}

#[test]
fn find_dispatches_over_matching_nodes() {
    let (mut ctx, mut shell) = session();
    assert!(shell.execute(&mut ctx, "cd /content").is_success());
    let res = shell.execute(&mut ctx, "find -r -t (common/document) (ga -a name)");
    assert!(res.is_success(), "{res}");
    assert_eq!(res.message, "home\nabout\n\nFound 2 nodes");
}

#[test]
fn chained_value_feeds_piped_commands() {
    let (mut ctx, mut shell) = session();
    assert!(shell.execute(&mut ctx, "cd /content/home").is_success());
    let res = shell.execute(&mut ctx, "ls > echo");
    assert_eq!(res.message, "  about\n  news");
}

#[test]
fn every_registered_command_has_a_help_page() {
    let (mut ctx, mut shell) = session();
    for reg in built_in_commands() {
        let res = shell.execute(&mut ctx, &format!("help {}", reg.name));
        assert!(res.is_success(), "help for {} failed: {res}", reg.name);
        assert!(!res.message.is_empty(), "help for {} is empty", reg.name);
    }
}
