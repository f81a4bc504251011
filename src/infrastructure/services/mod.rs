//! Infrastructure services

mod agent_factory;
mod rag_agent;

pub use agent_factory::{AgentFactory, OpenAiAgentFactory};
pub use rag_agent::{
    AgentModels, AskOutcome, RagAgent, RagConfig, SourceExcerpt, ASK_FAILURE_ANSWER,
    EMPTY_KNOWLEDGE_BASE_ANSWER, NO_RELEVANT_INFORMATION_ANSWER,
};

#[cfg(test)]
pub use agent_factory::mock::MockAgentFactory;
