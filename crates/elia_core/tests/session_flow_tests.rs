//! Whole-conversation scenarios: greeting, profile capture, product
//! checks, and recovery after failures.

use std::sync::Arc;

use elia_core::resolver::CONTINUOUS_CAVEAT;
use elia_core::{
    ConversationStage, FakeModelClient, KnowledgeBase, ModelClient, ModelError, Resolver,
    RetryPolicy, Sender, Session, Severity, SynonymTable,
};

fn local_session() -> Session {
    Session::new(Resolver::new(
        KnowledgeBase::builtin(),
        SynonymTable::builtin(),
    ))
}

fn backed_session(fake: &Arc<FakeModelClient>) -> Session {
    let client: Arc<dyn ModelClient> = fake.clone();
    let resolver = Resolver::new(KnowledgeBase::builtin(), SynonymTable::builtin())
        .with_client(client, "test-model")
        .with_retry(RetryPolicy {
            max_attempts: 3,
            base_delay_ms: 1,
            max_jitter_ms: 0,
        });
    Session::new(resolver)
}

#[tokio::test]
async fn test_happy_path_to_verdict() {
    let mut session = local_session();

    let greeting = session.greet();
    assert_eq!(greeting.len(), 2);
    assert!(greeting[0].text.as_deref().unwrap_or("").contains("Elia"));

    let replies = session.submit("je prends Leeloo à 8h").await;
    assert_eq!(replies.len(), 1);
    assert!(replies[0].text.as_deref().unwrap_or("").contains("Leeloo"));
    assert_eq!(session.stage(), ConversationStage::AwaitingProduct);

    let replies = session.submit("millepertuis").await;
    assert_eq!(replies.len(), 2);
    let verdict = replies[0].analysis.as_ref().unwrap();
    assert_eq!(verdict.level, Severity::Severe);
    assert!(replies[1].text.is_some());
    assert_eq!(session.stage(), ConversationStage::AwaitingProduct);
}

#[tokio::test]
async fn test_brand_then_time_split_turns() {
    let mut session = local_session();
    session.greet();

    let replies = session.submit("je prends Optimizette").await;
    assert!(replies[0].text.as_deref().unwrap_or("").contains("heure"));
    assert_eq!(session.stage(), ConversationStage::AwaitingContraception);

    let replies = session.submit("vers 21h30").await;
    assert!(replies[0]
        .text
        .as_deref()
        .unwrap_or("")
        .contains("Optimizette"));
    assert_eq!(session.stage(), ConversationStage::AwaitingProduct);
    assert_eq!(session.profile().intake_descriptor, "21h30");
}

#[tokio::test]
async fn test_time_then_brand_split_turns() {
    let mut session = local_session();
    session.greet();

    let replies = session.submit("à 8h").await;
    assert!(replies[0].text.as_deref().unwrap_or("").contains("pilule"));
    assert_eq!(session.stage(), ConversationStage::AwaitingContraception);

    let replies = session.submit("Jasmine").await;
    assert!(replies[0].text.as_deref().unwrap_or("").contains("Jasmine"));
    assert_eq!(session.stage(), ConversationStage::AwaitingProduct);
}

#[tokio::test]
async fn test_continuous_method_flow_adds_caveat() {
    let mut session = local_session();
    session.greet();

    let replies = session.submit("j'ai un implant depuis deux ans").await;
    assert!(replies[0]
        .text
        .as_deref()
        .unwrap_or("")
        .contains("diffusion continue"));
    assert_eq!(session.stage(), ConversationStage::AwaitingProduct);

    let replies = session.submit("millepertuis").await;
    let verdict = replies[0].analysis.as_ref().unwrap();
    assert!(verdict.contraception_impact.ends_with(CONTINUOUS_CAVEAT));
}

#[tokio::test]
async fn test_reprompt_loop_until_readable() {
    let mut session = local_session();
    session.greet();

    for _ in 0..3 {
        let replies = session.submit("je la prends").await;
        assert_eq!(replies.len(), 1);
        assert_eq!(session.stage(), ConversationStage::AwaitingContraception);
    }

    session.submit("Leeloo à 8h").await;
    assert_eq!(session.stage(), ConversationStage::AwaitingProduct);
}

#[tokio::test]
async fn test_empty_product_query_keeps_session_open() {
    let mut session = local_session();
    session.greet();
    session.submit("Leeloo à 8h").await;

    let replies = session.submit("   ").await;
    assert_eq!(replies.len(), 1);
    assert!(replies[0].analysis.is_none());
    assert_eq!(session.stage(), ConversationStage::AwaitingProduct);
}

#[tokio::test]
async fn test_backend_failure_then_recovery() {
    let fake = Arc::new(FakeModelClient::always_error(ModelError::Timeout(5)));
    let mut session = backed_session(&fake);
    session.greet();
    session.submit("Leeloo à 8h").await;

    let replies = session.submit("curcuma").await;
    assert_eq!(replies.len(), 1);
    assert!(replies[0].analysis.is_none());
    assert_eq!(session.stage(), ConversationStage::AwaitingProduct);

    // The session still answers from the knowledge base afterwards.
    let replies = session.submit("charbon actif").await;
    let verdict = replies[0].analysis.as_ref().unwrap();
    assert_eq!(verdict.level, Severity::Medium);
}

#[tokio::test]
async fn test_several_products_in_one_session() {
    let mut session = local_session();
    session.greet();
    session.submit("Leeloo à 8h").await;

    let first = session.submit("spiruline").await;
    assert_eq!(
        first[0].analysis.as_ref().unwrap().level,
        Severity::Low
    );

    let second = session.submit("charbon actif").await;
    assert_eq!(
        second[0].analysis.as_ref().unwrap().level,
        Severity::Medium
    );
}

#[tokio::test]
async fn test_transcript_records_the_whole_exchange() {
    let mut session = local_session();
    session.greet();
    session.submit("Leeloo à 8h").await;
    session.submit("millepertuis").await;

    let messages = session.transcript().messages();
    // greeting x2, user turn, confirmation, user query, analysis, prompt
    assert_eq!(messages.len(), 7);
    let senders: Vec<Sender> = messages.iter().map(|m| m.sender).collect();
    assert_eq!(
        senders,
        vec![
            Sender::Bot,
            Sender::Bot,
            Sender::User,
            Sender::Bot,
            Sender::User,
            Sender::Bot,
            Sender::Bot,
        ]
    );
    assert!(messages[5].analysis.is_some());
}
