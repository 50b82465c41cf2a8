//! REST backend tests against a local HTTP fake (wiremock).

use chat_engine_setup::agent::find_agent_by_display_name;
use chat_engine_setup::auth::TokenSource;
use chat_engine_setup::config::{AgentPersona, Config, ProvisionSettings};
use chat_engine_setup::error::ApiError;
use chat_engine_setup::flow::apply_generative_fallback;
use chat_engine_setup::generative::generative_settings;
use chat_engine_setup::models::{Agent, DataStore, Operation, TargetSite};
use chat_engine_setup::rest::{DialogflowClient, DiscoveryEngineClient, RestClient};
use chat_engine_setup::traits::{AgentBackend, Lookup, SearchBackend};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COLLECTION: &str = "projects/p/locations/global/collections/default_collection";
const DATASTORE: &str =
    "projects/p/locations/global/collections/default_collection/dataStores/a_datastore";
const AGENTS_PARENT: &str = "projects/p/locations/global";

fn rest_client() -> Arc<RestClient> {
    let rest = RestClient::new(&Config::default(), TokenSource::static_token("test-token"), "p")
        .unwrap()
        .with_polling(Duration::from_millis(10), Duration::from_secs(2));
    Arc::new(rest)
}

fn discovery(server: &MockServer) -> DiscoveryEngineClient {
    DiscoveryEngineClient::new(rest_client(), &server.uri())
}

fn dialogflow(server: &MockServer, page_size: u32) -> DialogflowClient {
    DialogflowClient::new(rest_client(), &server.uri(), page_size)
}

#[tokio::test]
async fn test_get_data_store_404_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/v1alpha/{}", DATASTORE)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": 404, "status": "NOT_FOUND"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let lookup = discovery(&server).get_data_store(DATASTORE).await.unwrap();
    assert_eq!(lookup, Lookup::NotFound);
}

#[tokio::test]
async fn test_get_data_store_403_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/v1alpha/{}", DATASTORE)))
        .respond_with(ResponseTemplate::new(403).set_body_string("PERMISSION_DENIED"))
        .mount(&server)
        .await;

    let err = discovery(&server).get_data_store(DATASTORE).await.unwrap_err();
    let api = err.downcast_ref::<ApiError>().unwrap();
    assert_eq!(api.status(), Some(403));
    assert!(err.to_string().contains("PERMISSION_DENIED"));
}

#[tokio::test]
async fn test_requests_carry_auth_and_quota_project() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/v1alpha/{}", DATASTORE)))
        .and(header("authorization", "Bearer test-token"))
        .and(header("x-goog-user-project", "p"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": DATASTORE,
            "displayName": "a_datastore",
            "industryVertical": "GENERIC",
            "contentConfig": "PUBLIC_WEBSITE",
            "createTime": "2024-05-01T10:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let lookup = discovery(&server).get_data_store(DATASTORE).await.unwrap();
    let ds = lookup.into_option().unwrap();
    assert_eq!(ds.display_name, "a_datastore");
    assert!(ds.create_time.is_some());
}

#[tokio::test]
async fn test_create_data_store_polls_operation() {
    let server = MockServer::start().await;
    let op_name = "projects/p/locations/global/collections/default_collection/operations/create-1";

    Mock::given(method("POST"))
        .and(path(format!("/v1alpha/{}/dataStores", COLLECTION)))
        .and(query_param("dataStoreId", "a_datastore"))
        .and(query_param("createAdvancedSiteSearch", "true"))
        .and(body_partial_json(json!({
            "displayName": "a_datastore",
            "solutionTypes": ["SOLUTION_TYPE_CHAT"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": op_name,
            "done": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/v1alpha/{}", op_name)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": op_name,
            "done": true,
            "response": {
                "@type": "type.googleapis.com/google.cloud.discoveryengine.v1alpha.DataStore",
                "name": DATASTORE,
                "displayName": "a_datastore"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = DataStore {
        display_name: "a_datastore".to_string(),
        solution_types: vec!["SOLUTION_TYPE_CHAT".to_string()],
        ..Default::default()
    };
    let created = discovery(&server)
        .create_data_store(COLLECTION, "a_datastore", &request, true)
        .await
        .unwrap();
    assert_eq!(created.name, DATASTORE);
}

#[tokio::test]
async fn test_failed_operation_is_error() {
    let server = MockServer::start().await;
    let op_name = "projects/p/locations/global/collections/default_collection/operations/create-2";

    Mock::given(method("POST"))
        .and(path(format!("/v1alpha/{}/engines", COLLECTION)))
        .and(query_param("engineId", "a_chat_engine"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": op_name,
            "done": true,
            "error": {"code": 6, "message": "engine already exists"}
        })))
        .mount(&server)
        .await;

    let engine = chat_engine_setup::models::Engine {
        display_name: "a_chat_engine".to_string(),
        ..Default::default()
    };
    let err = discovery(&server)
        .create_engine(COLLECTION, "a_chat_engine", &engine)
        .await
        .unwrap_err();
    match err.downcast_ref::<ApiError>() {
        Some(ApiError::Operation { code, message, .. }) => {
            assert_eq!(*code, 6);
            assert_eq!(message, "engine already exists");
        }
        other => panic!("expected operation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_agent_lookup_follows_page_tokens() {
    let server = MockServer::start().await;

    // Mounted first so it wins over the unfiltered first-page mock.
    Mock::given(method("GET"))
        .and(path(format!("/v3/{}/agents", AGENTS_PARENT)))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "agents": [
                {"name": format!("{}/agents/2", AGENTS_PARENT), "displayName": "c",
                 "defaultLanguageCode": "en", "timeZone": "America/Los_Angeles",
                 "startFlow": format!("{}/agents/2/flows/start", AGENTS_PARENT)}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/v3/{}/agents", AGENTS_PARENT)))
        .and(query_param("pageSize", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "agents": [
                {"name": format!("{}/agents/1", AGENTS_PARENT), "displayName": "C"}
            ],
            "nextPageToken": "page-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = dialogflow(&server, 1);
    let agent = find_agent_by_display_name(&client, AGENTS_PARENT, "c")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(agent.name, format!("{}/agents/2", AGENTS_PARENT));
    assert_eq!(agent.start_flow, format!("{}/agents/2/flows/start", AGENTS_PARENT));
}

#[tokio::test]
async fn test_flow_update_and_training() {
    let server = MockServer::start().await;
    let flow_name = format!("{}/agents/1/flows/start", AGENTS_PARENT);
    let op_name = format!("{}/operations/train-1", AGENTS_PARENT);

    Mock::given(method("GET"))
        .and(path(format!("/v3/{}", flow_name)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": flow_name,
            "displayName": "Default Start Flow",
            "transitionRoutes": [{"intent": "welcome"}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path(format!("/v3/{}", flow_name)))
        .and(body_partial_json(json!({
            "transitionRoutes": [{"intent": "welcome"}],
            "eventHandlers": [
                {
                    "event": "sys.no-match-default",
                    "triggerFulfillment": {"enableGenerativeFallback": true}
                },
                {
                    "event": "sys.no-input-default",
                    "triggerFulfillment": {"enableGenerativeFallback": true}
                }
            ],
            "knowledgeConnectorSettings": {
                "enabled": true,
                "dataStoreConnections": [{"dataStoreType": "PUBLIC_WEB", "dataStore": DATASTORE}]
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": flow_name})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/v3/{}:train", flow_name)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": op_name})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/v3/{}", op_name)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": op_name,
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = dialogflow(&server, 100);
    let mut flow = client.get_flow(&flow_name).await.unwrap();
    apply_generative_fallback(&mut flow, DATASTORE);
    client.update_flow(&flow).await.unwrap();

    let started = client.train_flow(&flow_name).await.unwrap();
    assert!(!started.done);
    let finished: Operation = client.wait_operation(&started).await.unwrap();
    assert!(finished.done);
}

#[tokio::test]
async fn test_operation_timeout() {
    let server = MockServer::start().await;
    let op_name = format!("{}/operations/slow", AGENTS_PARENT);

    Mock::given(method("GET"))
        .and(path(format!("/v3/{}", op_name)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": op_name,
            "done": false
        })))
        .mount(&server)
        .await;

    let rest = RestClient::new(&Config::default(), TokenSource::static_token("t"), "p")
        .unwrap()
        .with_polling(Duration::from_millis(5), Duration::from_millis(50));
    let client = DialogflowClient::new(Arc::new(rest), &server.uri(), 100);

    let pending = Operation {
        name: op_name.clone(),
        ..Default::default()
    };
    let err = client.wait_operation(&pending).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ApiError>(),
        Some(ApiError::OperationTimeout { .. })
    ));
}

#[tokio::test]
async fn test_create_target_site_posts_uri_pattern() {
    let server = MockServer::start().await;
    let parent = format!("{}/siteSearchEngine", DATASTORE);
    let op_name = format!("{}/operations/site-1", parent);

    Mock::given(method("POST"))
        .and(path(format!("/v1alpha/{}/targetSites", parent)))
        .and(body_partial_json(json!({"providedUriPattern": "example.com/*"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": op_name,
            "done": true,
            "response": {
                "name": format!("{}/targetSites/1", parent),
                "providedUriPattern": "example.com/*",
                "generatedUriPattern": "example.com/*"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let site = TargetSite {
        provided_uri_pattern: "example.com/*".to_string(),
        ..Default::default()
    };
    let created = discovery(&server)
        .create_target_site(&parent, &site)
        .await
        .unwrap();
    assert_eq!(created.name, format!("{}/targetSites/1", parent));
    assert_eq!(created.provided_uri_pattern, "example.com/*");
}

#[tokio::test]
async fn test_create_agent_posts_display_name_and_locale() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v3/{}/agents", AGENTS_PARENT)))
        .and(body_partial_json(json!({
            "displayName": "c",
            "defaultLanguageCode": "en",
            "timeZone": "America/Los_Angeles"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": format!("{}/agents/7", AGENTS_PARENT),
            "displayName": "c",
            "defaultLanguageCode": "en",
            "timeZone": "America/Los_Angeles",
            "startFlow": format!("{}/agents/7/flows/start", AGENTS_PARENT)
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = Agent {
        display_name: "c".to_string(),
        default_language_code: "en".to_string(),
        time_zone: "America/Los_Angeles".to_string(),
        ..Default::default()
    };
    let created = dialogflow(&server, 100)
        .create_agent(AGENTS_PARENT, &request)
        .await
        .unwrap();
    assert_eq!(created.name, format!("{}/agents/7", AGENTS_PARENT));
    assert!(created.start_flow.ends_with("/flows/start"));
}

#[tokio::test]
async fn test_generative_settings_patch_carries_persona() {
    let server = MockServer::start().await;
    let agent_name = format!("{}/agents/7", AGENTS_PARENT);
    let settings_name = format!("{}/generativeSettings", agent_name);

    Mock::given(method("PATCH"))
        .and(path(format!("/v3/{}", settings_name)))
        .and(body_partial_json(json!({
            "name": settings_name,
            "languageCode": "en",
            "knowledgeConnectorSettings": {
                "business": "c",
                "agent": "Donate",
                "agentIdentity": "chatbot",
                "businessDescription": "Save a life, a fictitious organization",
                "agentScope": "humans with eligibility information"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": settings_name,
            "languageCode": "en",
            "knowledgeConnectorSettings": {
                "business": "c",
                "agent": "Donate",
                "agentIdentity": "chatbot",
                "businessDescription": "Save a life, a fictitious organization",
                "agentScope": "humans with eligibility information"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = ProvisionSettings {
        project: "p".to_string(),
        location: "global".to_string(),
        app_name: "a".to_string(),
        company_name: "c".to_string(),
        uris: vec!["example.com/*".to_string()],
        datastore_storage_folder: String::new(),
        persona: AgentPersona {
            name: "Donate".to_string(),
            identity: "chatbot".to_string(),
            description: "Save a life, a fictitious organization".to_string(),
            scope: "humans with eligibility information".to_string(),
        },
        language_code: "en".to_string(),
        time_zone: "America/Los_Angeles".to_string(),
        wait_for_training: false,
    };
    let agent = Agent {
        name: agent_name.clone(),
        display_name: "c".to_string(),
        ..Default::default()
    };

    let request = generative_settings(&agent, &settings);
    let updated = dialogflow(&server, 100)
        .update_generative_settings(&request)
        .await
        .unwrap();
    assert_eq!(
        updated.knowledge_connector_settings.agent_scope,
        "humans with eligibility information"
    );
}
