//! One conversation: stage transitions, profile capture, product checks.
//!
//! `submit` returns the bot messages produced by the turn; the user's own
//! message goes straight into the transcript. Rendering and pacing belong
//! to the caller.

use tracing::{debug, info};

use crate::dialogue;
use crate::extract::scan_turn;
use crate::profile::UserProfile;
use crate::resolver::{Outcome, Resolver};
use crate::stage::ConversationStage;
use crate::transcript::{Message, Transcript};

pub struct Session {
    stage: ConversationStage,
    profile: UserProfile,
    transcript: Transcript,
    resolver: Resolver,
}

impl Session {
    pub fn new(resolver: Resolver) -> Self {
        Self {
            stage: ConversationStage::Greeting,
            profile: UserProfile::default(),
            transcript: Transcript::new(),
            resolver,
        }
    }

    pub fn stage(&self) -> ConversationStage {
        self.stage
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn is_busy(&self) -> bool {
        self.stage == ConversationStage::Processing
    }

    /// Open the conversation. Only valid once, from the greeting stage;
    /// later calls return nothing.
    pub fn greet(&mut self) -> Vec<Message> {
        if self.stage != ConversationStage::Greeting {
            return Vec::new();
        }
        let messages = vec![
            Message::bot(dialogue::greeting_intro()),
            Message::bot(dialogue::greeting_question()),
        ];
        for message in &messages {
            self.transcript.push(message.clone());
        }
        self.stage = ConversationStage::AwaitingContraception;
        info!("session opened");
        messages
    }

    /// Feed one user turn through the current stage. If the session was
    /// never greeted, the greeting fires first and the turn is processed
    /// right after it.
    pub async fn submit(&mut self, text: &str) -> Vec<Message> {
        match self.stage {
            ConversationStage::Processing => {
                debug!("submission ignored while a resolution is in flight");
                Vec::new()
            }
            ConversationStage::Greeting => {
                let mut messages = self.greet();
                messages.extend(self.accept_contraception_turn(text));
                messages
            }
            ConversationStage::AwaitingContraception => self.accept_contraception_turn(text),
            ConversationStage::AwaitingProduct => self.accept_product_turn(text).await,
        }
    }

    fn accept_contraception_turn(&mut self, text: &str) -> Vec<Message> {
        self.transcript.push(Message::user(text));
        let replies = self.handle_contraception_turn(text);
        for reply in &replies {
            self.transcript.push(reply.clone());
        }
        replies
    }

    async fn accept_product_turn(&mut self, text: &str) -> Vec<Message> {
        self.transcript.push(Message::user(text));
        let replies = self.handle_product_turn(text).await;
        for reply in &replies {
            self.transcript.push(reply.clone());
        }
        replies
    }

    /// Fill profile slots from one turn. Both slots filled (or a
    /// continuous-delivery method named) moves the session on to product
    /// checks; a single slot asks for the other; nothing recognized asks
    /// again.
    fn handle_contraception_turn(&mut self, text: &str) -> Vec<Message> {
        let scan = scan_turn(text);

        if scan.continuous {
            self.profile.record_continuous_delivery();
            self.advance_to_product();
            return vec![Message::bot(dialogue::profile_confirmed(&self.profile))];
        }

        match (scan.brand, scan.time) {
            (Some(brand), Some(time)) => {
                self.profile.record_contraceptive(&brand);
                self.profile.record_intake(&time.display);
                self.advance_to_product();
                vec![Message::bot(dialogue::profile_confirmed(&self.profile))]
            }
            (Some(brand), None) if self.profile.has_intake() => {
                self.profile.record_contraceptive(&brand);
                self.advance_to_product();
                vec![Message::bot(dialogue::profile_confirmed(&self.profile))]
            }
            (None, Some(time)) if self.profile.has_contraceptive() => {
                self.profile.record_intake(&time.display);
                self.advance_to_product();
                vec![Message::bot(dialogue::profile_confirmed(&self.profile))]
            }
            (Some(brand), None) => {
                self.profile.record_contraceptive(&brand);
                vec![Message::bot(dialogue::ask_intake_time(&brand))]
            }
            (None, Some(time)) => {
                self.profile.record_intake(&time.display);
                vec![Message::bot(dialogue::ask_brand(&time.display))]
            }
            (None, None) => {
                vec![Message::bot(dialogue::reprompt_contraception(
                    dialogue::seed_from_str(text),
                ))]
            }
        }
    }

    /// Run one product check. The stage sits at `Processing` for the
    /// duration of the resolution and always returns to `AwaitingProduct`,
    /// whatever the outcome.
    async fn handle_product_turn(&mut self, text: &str) -> Vec<Message> {
        self.stage = ConversationStage::Processing;
        let outcome = self.resolver.resolve(text, &self.profile).await;
        self.stage = ConversationStage::AwaitingProduct;

        match outcome {
            Outcome::Verdict(result) => vec![
                Message::bot_analysis(*result),
                Message::bot(dialogue::another_check_prompt(dialogue::seed_from_str(
                    text,
                ))),
            ],
            Outcome::Notice(notice) => vec![Message::bot(notice)],
        }
    }

    fn advance_to_product(&mut self) {
        self.stage = ConversationStage::AwaitingProduct;
        info!(profile = %self.profile.summary(), "profile complete");
    }
}
