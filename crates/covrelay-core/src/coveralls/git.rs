//! Git metadata for Coveralls jobs.
//!
//! Populates `GitInfo` (head commit, branch, remotes) by shelling out to `git`.

use std::path::Path;
use std::process::Command;

use regex::Regex;

use crate::upload::{GitHead, GitInfo, GitRemote};

/// Collect git metadata for `cwd`.
///
/// CI-provided commit and branch take precedence over what the local
/// checkout reports (CI checkouts are often detached). Without a repository
/// the result holds the CI commit only, or is `None` when there is none.
pub fn get_git_info(
    cwd: &Path,
    commit_override: Option<&str>,
    branch_override: Option<&str>,
) -> Option<GitInfo> {
    if !inside_work_tree(cwd) {
        return commit_override.map(|id| GitInfo {
            head: GitHead {
                id: id.to_string(),
                ..GitHead::default()
            },
            branch: branch_override.unwrap_or_default().to_string(),
            remotes: Vec::new(),
        });
    }

    let id = match commit_override {
        Some(id) => id.to_string(),
        None => get_git_revision(cwd)?,
    };

    let head = get_commit_details(cwd, &id).unwrap_or_else(|| GitHead {
        id: id.clone(),
        ..GitHead::default()
    });

    let branch = branch_override
        .map(str::to_string)
        .or_else(|| get_git_branch(cwd))
        .unwrap_or_default();

    Some(GitInfo {
        head,
        branch,
        remotes: get_git_remotes(cwd),
    })
}

/// Whether `cwd` lies inside a git work tree (bare repositories do not count).
fn inside_work_tree(cwd: &Path) -> bool {
    run_git(cwd, &["rev-parse", "--is-inside-work-tree"]).as_deref() == Some("true")
}

fn run_git(cwd: &Path, args: &[&str]) -> Option<String> {
    Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Get the current git revision (commit SHA).
fn get_git_revision(cwd: &Path) -> Option<String> {
    run_git(cwd, &["rev-parse", "HEAD"])
}

/// Get the current branch name; `None` on a detached HEAD.
fn get_git_branch(cwd: &Path) -> Option<String> {
    run_git(cwd, &["rev-parse", "--abbrev-ref", "HEAD"]).filter(|b| b != "HEAD")
}

/// Author, committer and subject of a commit.
fn get_commit_details(cwd: &Path, id: &str) -> Option<GitHead> {
    let output = run_git(
        cwd,
        &["log", "-1", "--pretty=format:%aN%n%aE%n%cN%n%cE%n%s", id],
    )?;
    Some(parse_commit_details(id, &output))
}

fn parse_commit_details(id: &str, output: &str) -> GitHead {
    let mut fields = output.lines().map(|l| {
        let l = l.trim();
        (!l.is_empty()).then(|| l.to_string())
    });

    GitHead {
        id: id.to_string(),
        author_name: fields.next().flatten(),
        author_email: fields.next().flatten(),
        committer_name: fields.next().flatten(),
        committer_email: fields.next().flatten(),
        message: fields.next().flatten(),
    }
}

fn get_git_remotes(cwd: &Path) -> Vec<GitRemote> {
    run_git(cwd, &["remote", "-v"])
        .map(|output| parse_remotes(&output))
        .unwrap_or_default()
}

/// Parse `git remote -v` output, keeping fetch URLs.
fn parse_remotes(output: &str) -> Vec<GitRemote> {
    let re = Regex::new(r"^(\S+)\s+(\S+)\s+\(fetch\)$").expect("valid remote pattern");
    output
        .lines()
        .filter_map(|line| re.captures(line.trim()))
        .map(|caps| GitRemote {
            name: caps[1].to_string(),
            url: caps[2].to_string(),
        })
        .collect()
}
