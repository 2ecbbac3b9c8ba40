use jbridge_codegen::{map_type, GeneratorConfig, TargetType};
use jbridge_model::{ClosureSignature, GenerationStrategy};

use crate::error::{convert_syntax_error, CliError, ErrorContext};

/// Prints the strategy and target method shape for a single written closure type.
pub fn handle_classify(ty: &str, config: &GeneratorConfig) -> Result<(), CliError> {
    let signature = jbridge_syntax::parse_closure_type(ty)
        .map_err(|e| convert_syntax_error(e, ErrorContext { source: ty }))?;
    signature.validate()?;
    println!("{}", describe(&signature, &config.package));
    Ok(())
}

fn describe(signature: &ClosureSignature, package: &str) -> String {
    let declared = GenerationStrategy::declared(signature.escaping, signature.is_async);
    let strategy = signature.strategy();
    let params: Vec<String> = signature
        .params
        .iter()
        .filter_map(|param| map_type(&param.ty, package))
        .map(|mapping| mapping.target.to_string())
        .collect();
    let value = map_type(&signature.ret, package)
        .map(|mapping| mapping.target)
        .unwrap_or_else(TargetType::void);
    let ret = if strategy.is_async() {
        TargetType::future_of(&value)
    } else {
        value
    };

    let mut out = format!("{}\n  strategy: {}", signature, strategy);
    if declared != strategy {
        out.push_str(&format!(" (declared {})", declared));
    }
    out.push_str(&format!("\n  target:   {} ({})", ret, params.join(", ")));
    out
}
