use super::{build_speaker, init_common_components, start_session};

/// Input parameters for the Wellbeing command strategy.
#[derive(Debug, Clone)]
pub struct WellbeingInput {
    /// Optional model override
    pub model: Option<String>,
}

/// Strategy for a one-off well-being check.
///
/// Suited to being run from a scheduler such as cron. The reply is always
/// spoken.
#[derive(Debug, Clone, Copy)]
pub struct WellbeingStrategy;

impl super::CommandStrategy for WellbeingStrategy {
    type Input = WellbeingInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let common = init_common_components()?;
        let (config, mut manager) = start_session(common, input.model).await?;
        let speaker = build_speaker(&config, false);

        if let Some(response) = manager.check_wellbeing(speaker.as_ref()).await? {
            println!("{response}");
        }

        manager.finish()?;
        Ok(())
    }
}
