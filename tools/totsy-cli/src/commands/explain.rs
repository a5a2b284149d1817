//! Explain why a product was recommended.

use anyhow::Result;
use totsy_commerce::generation::ExplanationRequest;

use super::ExplainArgs;
use crate::context::Context;

/// Run the explain command.
pub async fn run(args: ExplainArgs, ctx: &Context) -> Result<()> {
    let request = ExplanationRequest {
        product_name: args.product,
        brand: args.brand,
        category: args.category,
        user_input: args.input,
        why: args.why,
    };

    let generator = ctx.generator(args.response_file.as_deref());
    let spinner = ctx.output.spinner("Asking for an explanation...");
    let explanation = generator.explain(&request);
    spinner.finish_and_clear();

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "request": request,
            "explanation": explanation.explanation,
            "fallback": explanation.is_fallback,
        }));
        return Ok(());
    }

    ctx.output.header(&format!("Why {}", request.product_name));
    ctx.output.line(&explanation.explanation);
    if explanation.is_fallback {
        ctx.output
            .debug("Generation service gave no answer; showing the generic explanation");
    }

    Ok(())
}
