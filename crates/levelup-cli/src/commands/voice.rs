//! The `levelup voice` command.

use anyhow::Result;

use super::Context;

pub fn execute(ctx: &Context, voice: Option<String>) -> Result<()> {
    let mut data = ctx.load_data()?;
    match voice.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(voice) => {
            println!("Voice set to {voice}.");
            data.config.voice_id = Some(voice);
        }
        None => {
            println!("Voice preference cleared.");
            data.config.voice_id = None;
        }
    }
    ctx.save_data(&data)
}
