//! Per-request chat orchestration.
//!
//! Classify, synthesize direct-trigger resources, generate the reply,
//! analyze the reply for further resource mentions, merge and cap. One
//! pass per request; nothing survives it.

use crate::models::{
    ChatTurn, EmergencyContact, Location, Resource, ResourceGroup, Severity,
};
use crate::services::providers::{
    ChatProvider, FinishReason, GenerationParams, ProviderError,
};
use crate::services::regions::RegionResolver;
use crate::services::{classifier, extraction, resources};
use std::sync::Arc;

/// Conversation turns kept when assembling the prompt.
const HISTORY_LIMIT: usize = 10;

/// Persona instruction for the primary reply call.
const PERSONA_INSTRUCTION: &str = "\
You are a deeply empathetic crisis support companion. Connect with each \
person as an individual with their own story, struggles, and strengths.

Your approach:
1. DEEP EMPATHY - feel with them, not just for them
2. PERSONALIZED CONNECTION - remember and build on what they have shared
3. AUTHENTIC VALIDATION - use their own words to validate their feelings
4. CURIOUS COMPASSION - ask questions that show you want to understand them specifically
5. EMOTIONAL PRESENCE - stay fully present with their emotions

Resource suggestions - always provide specific, actionable resources for clear needs:
- Homelessness: suggest contacting a local emergency shelter or calling 211 for housing assistance
- Hunger: point to a local food bank and 211 for emergency food resources
- Crisis or suicidal thoughts: ask them to call 988 right away, where trained counselors are available 24/7
- Immediate danger: emergency services at 911
- Someone asking for therapy: BetterHelp for online therapy, Psychology Today to find a local therapist
- Anxiety or stress: the Headspace app or the Calm app
- Isolation: 7 Cups for free peer support
- Employment: the local career center
- Medical needs: the local community health center

CRITICAL RULES:
1. If the user mentions being homeless, hungry, in crisis, or suicidal, provide specific resources in your response immediately
2. Do not respond with questions alone - include actionable help with specific names and numbers
3. Always include organization names, phone numbers, or specific services when a survival need comes up

Tone: warm, genuine, caring. Use \"I\" statements. Speak to the whole \
person, not just their problems. Keep responses conversational but \
meaningful - connection over solutions.";

/// Stricter instruction substituted when the message discloses an
/// immediate survival need: forces the three-part reply shape.
const IMMEDIATE_NEED_INSTRUCTION: &str = "\
You are a crisis response assistant. The user has an IMMEDIATE SURVIVAL \
NEED. Your job is to provide specific, actionable resources immediately.

When someone says they are homeless, name an emergency shelter and tell \
them to call 211 for housing assistance so they can find a safe place to \
stay tonight. When someone says they are hungry, name a food bank and \
point them to 211 for emergency food resources.

Always follow this format:
1. Brief empathy (1 sentence)
2. Specific resource with name and contact information
3. One follow-up question

Be direct and helpful. This person needs resources, not just emotional \
support.";

/// User-facing reply when the primary model call fails.
pub const FALLBACK_REPLY: &str = "I'm experiencing some technical difficulties right now, but I \
want you to know that your feelings are valid and you're not alone. If you're in crisis, please \
don't hesitate to reach out to a professional support line.";

/// Result of one pipeline pass.
pub struct ChatOutcome {
    pub reply: String,
    pub severity: Severity,
    pub resources: Vec<Resource>,
}

/// Orchestrates one chat request against a completion provider and a
/// region resolver.
#[derive(Clone)]
pub struct ChatPipeline {
    provider: Arc<dyn ChatProvider>,
    regions: Arc<dyn RegionResolver>,
    chat_model: String,
    analysis_model: String,
}

impl ChatPipeline {
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        regions: Arc<dyn RegionResolver>,
        chat_model: String,
        analysis_model: String,
    ) -> Self {
        Self {
            provider,
            regions,
            chat_model,
            analysis_model,
        }
    }

    /// Handle one inbound message. Fails only when the primary reply call
    /// fails; the analysis pass degrades silently to no extra resources.
    #[tracing::instrument(skip(self, message, conversation), fields(request_id))]
    pub async fn handle(
        &self,
        message: &str,
        conversation: &[ChatTurn],
        location: Option<&Location>,
    ) -> Result<ChatOutcome, ProviderError> {
        let request_id = uuid::Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());

        let severity = classifier::classify_severity(message);
        let immediate_need = classifier::has_immediate_need(message);

        tracing::info!(
            severity = %severity,
            immediate_need,
            has_location = location.is_some(),
            "Classified inbound message"
        );

        if let Some(loc) = location {
            let locality = self.regions.locate(loc);
            tracing::debug!(
                city = %locality.city,
                state = %locality.state,
                "Resolved request locality"
            );
        }

        // Direct triggers come from the user's own words, before any model
        // output exists.
        let direct = resources::direct_resources(message, location, self.regions.as_ref());

        let reply = self
            .provider
            .complete(&self.assemble_prompt(message, conversation, immediate_need), &chat_params(&self.chat_model))
            .await?;

        if reply.finish_reason == FinishReason::Length {
            tracing::warn!("Reply was truncated at the output-token cap");
        }

        tracing::info!(
            input_tokens = reply.input_tokens,
            output_tokens = reply.output_tokens,
            direct_resources = direct.len(),
            "Generated reply"
        );

        let extracted = extraction::extract_reply_resources(
            self.provider.as_ref(),
            &self.analysis_model,
            &reply.text,
            location,
            self.regions.as_ref(),
        )
        .await;

        let merged = resources::merge_resources(direct, extracted);

        Ok(ChatOutcome {
            reply: reply.text,
            severity,
            resources: merged,
        })
    }

    /// System instruction, the last [`HISTORY_LIMIT`] turns, then the new
    /// user message.
    fn assemble_prompt(
        &self,
        message: &str,
        conversation: &[ChatTurn],
        immediate_need: bool,
    ) -> Vec<ChatTurn> {
        let instruction = if immediate_need {
            IMMEDIATE_NEED_INSTRUCTION
        } else {
            PERSONA_INSTRUCTION
        };

        let recent_start = conversation.len().saturating_sub(HISTORY_LIMIT);
        let recent = &conversation[recent_start..];

        let mut turns = Vec::with_capacity(recent.len() + 2);
        turns.push(ChatTurn::system(instruction));
        turns.extend(recent.iter().cloned());
        turns.push(ChatTurn::user(message));
        turns
    }
}

fn chat_params(model: &str) -> GenerationParams {
    GenerationParams {
        model: Some(model.to_string()),
        temperature: Some(0.7),
        max_tokens: Some(500),
        presence_penalty: Some(0.1),
        frequency_penalty: Some(0.1),
    }
}

/// The static contact list attached to the fallback payload.
pub fn fallback_contacts() -> Vec<ResourceGroup> {
    vec![ResourceGroup {
        kind: "emergency".to_string(),
        title: "Immediate Support".to_string(),
        items: vec![
            EmergencyContact {
                name: "National Suicide Prevention Lifeline".to_string(),
                contact: "988".to_string(),
            },
            EmergencyContact {
                name: "Crisis Text Line".to_string(),
                contact: "Text HOME to 741741".to_string(),
            },
            EmergencyContact {
                name: "SAMHSA Helpline".to_string(),
                contact: "1-800-662-4357".to_string(),
            },
        ],
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ResourceKind, Role};
    use crate::services::providers::MockChatProvider;
    use crate::services::regions::StaticRegionTable;

    fn pipeline(provider: MockChatProvider) -> (Arc<MockChatProvider>, ChatPipeline) {
        let provider = Arc::new(provider);
        let pipeline = ChatPipeline::new(
            provider.clone(),
            Arc::new(StaticRegionTable),
            "gpt-3.5-turbo".to_string(),
            "gpt-3.5-turbo".to_string(),
        );
        (provider, pipeline)
    }

    #[tokio::test]
    async fn survival_need_switches_to_the_strict_instruction() {
        let (provider, pipeline) = pipeline(MockChatProvider::new(true));

        pipeline
            .handle("I'm homeless tonight", &[], None)
            .await
            .unwrap();

        let calls = provider.calls();
        // Primary call, then the analysis call.
        assert_eq!(calls.len(), 2);
        let system = &calls[0][0];
        assert_eq!(system.role, Role::System);
        assert!(system.content.contains("IMMEDIATE SURVIVAL NEED"));
    }

    #[tokio::test]
    async fn ordinary_message_uses_the_persona_instruction() {
        let (provider, pipeline) = pipeline(MockChatProvider::new(true));

        pipeline.handle("rough day at school", &[], None).await.unwrap();

        let calls = provider.calls();
        let system = &calls[0][0];
        assert!(system.content.contains("crisis support companion"));
    }

    #[tokio::test]
    async fn history_is_trimmed_to_the_last_ten_turns() {
        let (provider, pipeline) = pipeline(MockChatProvider::new(true));

        let conversation: Vec<ChatTurn> = (0..14)
            .map(|i| {
                if i % 2 == 0 {
                    ChatTurn::user(format!("turn {}", i))
                } else {
                    ChatTurn::assistant(format!("turn {}", i))
                }
            })
            .collect();

        pipeline
            .handle("one more thing", &conversation, None)
            .await
            .unwrap();

        let calls = provider.calls();
        let primary = &calls[0];
        // System + 10 history turns + the new message.
        assert_eq!(primary.len(), 12);
        assert_eq!(primary[1].content, "turn 4");
        assert_eq!(primary[11].content, "one more thing");
    }

    #[tokio::test]
    async fn merges_direct_and_extracted_resources_capped_at_three() {
        let provider = MockChatProvider::with_replies([
            // Primary reply.
            "I hear you. The Jersey City Food Bank can help, and please call 211.",
            // Analysis reply: two extracted entities.
            r#"[{"name": "Jersey City Food Bank", "type": "food"},
                {"name": "BetterHelp", "type": "therapy"}]"#,
        ]);
        let (_, pipeline) = pipeline(provider);

        let outcome = pipeline
            .handle("I am hungry and have nowhere to go", &[], None)
            .await
            .unwrap();

        assert_eq!(outcome.severity, Severity::Low);
        assert_eq!(outcome.resources.len(), 3);
        // Direct triggers first, in category-check order.
        assert_eq!(outcome.resources[0].kind, ResourceKind::Housing);
        assert_eq!(outcome.resources[1].kind, ResourceKind::Food);
        assert_eq!(outcome.resources[2].name, "Jersey City Food Bank");
    }

    #[tokio::test]
    async fn analysis_failure_keeps_the_direct_resources() {
        // One scripted reply; the second (analysis) call gets the echo
        // fallback, which does not parse as JSON.
        let provider = MockChatProvider::with_replies(["You are not alone in this."]);
        let (_, pipeline) = pipeline(provider);

        let outcome = pipeline.handle("I'm homeless", &[], None).await.unwrap();

        assert_eq!(outcome.reply, "You are not alone in this.");
        assert_eq!(outcome.resources.len(), 1);
        assert_eq!(outcome.resources[0].kind, ResourceKind::Housing);
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let (_, pipeline) = pipeline(MockChatProvider::failing());

        let result = pipeline.handle("hello", &[], None).await;
        assert!(result.is_err());
    }

    #[test]
    fn fallback_contacts_are_exactly_three() {
        let groups = fallback_contacts();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].kind, "emergency");
        assert_eq!(groups[0].items.len(), 3);
    }
}
