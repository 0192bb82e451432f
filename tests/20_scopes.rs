mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;
use uuid::Uuid;

use todos_api::store::TodoStore;

use common::TestApi;

fn doc(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    value.as_object().unwrap().clone()
}

#[tokio::test]
async fn a_token_without_scopes_gets_an_empty_403() -> Result<()> {
    let api = TestApi::start().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(&api.base_url)
        .bearer_auth(api.token(""))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert!(res.bytes().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn each_operation_requires_its_own_scope() -> Result<()> {
    let api = TestApi::start().await?;
    let client = reqwest::Client::new();
    let read_only = api.token("read:to-dos");

    let res = client
        .get(&api.base_url)
        .bearer_auth(&read_only)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(&api.base_url)
        .bearer_auth(&read_only)
        .json(&json!({"title": "nope"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .put(api.url(&format!("/{}", Uuid::new_v4())))
        .bearer_auth(&read_only)
        .json(&json!({"done": true}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .delete(api.url(&format!("/{}", Uuid::new_v4())))
        .bearer_auth(&read_only)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn a_multi_scope_token_unlocks_exactly_those_operations() -> Result<()> {
    let api = TestApi::start().await?;
    let client = reqwest::Client::new();
    let token = api.token("read:to-dos create:to-dos");

    let res = client
        .post(&api.base_url)
        .bearer_auth(&token)
        .json(&json!({"title": "allowed"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.get(&api.base_url).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let id = api.store.list_all().await?[0].id;
    let res = client
        .delete(api.url(&format!("/{}", id)))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn scope_names_never_match_by_prefix() -> Result<()> {
    let api = TestApi::start().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(&api.base_url)
        .bearer_auth(api.token("read:to-dos-archive read"))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn a_forbidden_write_leaves_the_store_untouched() -> Result<()> {
    let api = TestApi::start().await?;
    let client = reqwest::Client::new();

    let id = api.store.insert(doc(json!({"title": "original"}))).await?;

    let res = client
        .put(api.url(&format!("/{}", id)))
        .bearer_auth(api.token("read:to-dos"))
        .json(&json!({"title": "defaced"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .delete(api.url(&format!("/{}", id)))
        .bearer_auth(api.token("read:to-dos"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let todos = api.store.list_all().await?;
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].fields["title"], "original");
    Ok(())
}
