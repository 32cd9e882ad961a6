//! Wire-level tests for the GitLab and GitHub clients against a mock server.

use docsmith_core::ProjectRef;
use docsmith_host::github::GitHubHost;
use docsmith_host::gitlab::GitLabHost;
use docsmith_host::{gather_report, CodeHost, HostConfig, HostError};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gitlab_for(server: &MockServer) -> GitLabHost {
    GitLabHost::new(HostConfig {
        base_url: Some(server.uri()),
        token: Some("glpat-test".into()),
    })
}

fn github_for(server: &MockServer) -> GitHubHost {
    GitHubHost::new(HostConfig {
        base_url: Some(server.uri()),
        token: None,
    })
}

#[tokio::test]
async fn gitlab_project_info_encodes_path_and_sends_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/projects/group%2Fapp"))
        .and(header("PRIVATE-TOKEN", "glpat-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "name": "app",
            "path_with_namespace": "group/app",
            "description": "An app",
            "default_branch": "main",
            "visibility": "private",
            "star_count": 12,
            "forks_count": 3,
            "open_issues_count": 4,
            "topics": ["ml"],
            "web_url": "https://gitlab.example/group/app",
            "license": {"name": "MIT"}
        })))
        .mount(&server)
        .await;

    let host = gitlab_for(&server);
    let project = ProjectRef::parse("group/app").unwrap();
    let info = host.project_info(&project).await.unwrap();

    assert_eq!(info.name, "app");
    assert_eq!(info.star_count, 12);
    assert_eq!(info.license.as_deref(), Some("MIT"));
}

#[tokio::test]
async fn gitlab_without_token_fails_auth() {
    let host = GitLabHost::new(HostConfig {
        base_url: Some("http://127.0.0.1:1".into()),
        token: None,
    });
    let project = ProjectRef::parse("group/app").unwrap();
    let err = host.project_info(&project).await.unwrap_err();
    assert!(matches!(err, HostError::Auth(_)));
}

#[tokio::test]
async fn gitlab_missing_project_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("404 Project Not Found"))
        .mount(&server)
        .await;

    let host = gitlab_for(&server);
    let project = ProjectRef::parse("group/missing").unwrap();
    let err = host.project_info(&project).await.unwrap_err();
    assert!(matches!(err, HostError::NotFound(_)));
}

#[tokio::test]
async fn gitlab_readme_falls_back_to_master() {
    let server = MockServer::start().await;
    // README.md on main: missing
    Mock::given(method("GET"))
        .and(path("/api/v4/projects/group%2Fapp/repository/files/README.md/raw"))
        .and(query_param("ref", "main"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    // README.md on master: present
    Mock::given(method("GET"))
        .and(path("/api/v4/projects/group%2Fapp/repository/files/README.md/raw"))
        .and(query_param("ref", "master"))
        .respond_with(ResponseTemplate::new(200).set_body_string("# App readme"))
        .mount(&server)
        .await;

    let host = gitlab_for(&server);
    let project = ProjectRef::parse("group/app").unwrap();
    let readme = host.readme(&project, Some("main")).await.unwrap();
    assert_eq!(readme.as_deref(), Some("# App readme"));
}

#[tokio::test]
async fn gitlab_full_report_with_warnings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/projects/group%2Fapp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "name": "app",
            "path_with_namespace": "group/app",
            "default_branch": "main"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/projects/group%2Fapp/repository/tree"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "src", "path": "src", "type": "tree", "mode": "040000"},
            {"name": "Cargo.toml", "path": "Cargo.toml", "type": "blob", "mode": "100644"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/projects/group%2Fapp/repository/commits"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;
    // README probes all 404
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let host = gitlab_for(&server);
    let project = ProjectRef::parse("group/app").unwrap();
    let report = gather_report(&host, &project).await.unwrap();

    assert_eq!(report.file_tree.len(), 2);
    assert!(report.recent_commits.is_empty());
    assert!(report.readme.is_none());
    // Commits errored; README merely absent (not a warning).
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("recent commits"));
}

#[tokio::test]
async fn github_repo_info_maps_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/app"))
        .and(header("User-Agent", "docsmith"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 99,
            "name": "app",
            "full_name": "octo/app",
            "private": false,
            "default_branch": "main",
            "stargazers_count": 100,
            "forks_count": 10,
            "open_issues_count": 5,
            "topics": ["cli"],
            "html_url": "https://github.com/octo/app",
            "pushed_at": "2025-07-01T00:00:00Z",
            "license": {"name": "Apache License 2.0"}
        })))
        .mount(&server)
        .await;

    let host = github_for(&server);
    let project = ProjectRef::parse("octo/app").unwrap();
    let info = host.project_info(&project).await.unwrap();

    assert_eq!(info.path_with_namespace, "octo/app");
    assert_eq!(info.visibility.as_deref(), Some("public"));
    assert_eq!(info.star_count, 100);
    assert_eq!(info.license.as_deref(), Some("Apache License 2.0"));
}

#[tokio::test]
async fn github_commits_take_title_from_first_line() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/app/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "sha": "deadbeefcafe",
            "html_url": "https://github.com/octo/app/commit/deadbeef",
            "commit": {
                "message": "Fix parser\n\nLonger body here.",
                "author": {"name": "Octo", "date": "2025-07-01T00:00:00Z"}
            }
        }])))
        .mount(&server)
        .await;

    let host = github_for(&server);
    let project = ProjectRef::parse("octo/app").unwrap();
    let commits = host.recent_commits(&project, 5).await.unwrap();

    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].short_id, "deadbee");
    assert_eq!(commits[0].title, "Fix parser");
    assert_eq!(commits[0].author_name, "Octo");
}

#[tokio::test]
async fn github_missing_readme_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/app/readme"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let host = github_for(&server);
    let project = ProjectRef::parse("octo/app").unwrap();
    assert!(host.readme(&project, None).await.unwrap().is_none());
}
