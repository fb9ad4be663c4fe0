//! [`Evaluator`] backed by the Boa JavaScript engine.

use boa_engine::object::ObjectInitializer;
use boa_engine::property::Attribute;
use boa_engine::{Context, JsError, JsNativeErrorKind, JsString, JsValue, Source};

use super::{EvalContext, EvalError, Evaluator, SandboxLimits};

/// Creates a fresh Boa [`Context`] for every resolution.
///
/// Contexts are not shared, so nothing a loader or a replayed assignment does is visible to the
/// next one.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoaEvaluator {
    limits: SandboxLimits,
}

impl BoaEvaluator {
    pub fn new(limits: SandboxLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> SandboxLimits {
        self.limits
    }
}

impl Evaluator for BoaEvaluator {
    fn context(&self) -> Box<dyn EvalContext> {
        Box::new(BoaContext::new(self.limits))
    }
}

/// One isolated Boa realm with the runtime limits applied.
pub struct BoaContext {
    context: Context,
}

impl BoaContext {
    pub fn new(limits: SandboxLimits) -> Self {
        let mut context = Context::default();
        let runtime = context.runtime_limits_mut();
        runtime.set_loop_iteration_limit(limits.fuel);
        runtime.set_recursion_limit(limits.max_call_depth);
        Self { context }
    }

    fn run(&mut self, source: &str) -> Result<JsValue, EvalError> {
        self.context
            .eval(Source::from_bytes(source))
            .map_err(|err| eval_error(&err, &mut self.context))
    }
}

impl EvalContext for BoaContext {
    fn bind_namespace(&mut self, name: &str) -> Result<(), EvalError> {
        let namespace = ObjectInitializer::new(&mut self.context).build();
        self.context
            .register_global_property(JsString::from(name), namespace, Attribute::all())
            .map_err(|err| eval_error(&err, &mut self.context))
    }

    fn execute(&mut self, source: &str) -> Result<(), EvalError> {
        self.run(source).map(|_| ())
    }

    fn evaluate(&mut self, source: &str) -> Result<String, EvalError> {
        let value = self.run(source)?;
        let text = value
            .to_string(&mut self.context)
            .map_err(|err| eval_error(&err, &mut self.context))?;
        Ok(text.to_std_string_escaped())
    }
}

/// Classify an engine error. Thrown values that are not `Error` objects are stringified.
fn eval_error(err: &JsError, context: &mut Context) -> EvalError {
    match err.try_native(context) {
        Ok(native) => {
            let message = native.to_string();
            match &native.kind {
                JsNativeErrorKind::Syntax => EvalError::Syntax(message),
                JsNativeErrorKind::Reference => EvalError::Reference(message),
                JsNativeErrorKind::Type => EvalError::Type(message),
                JsNativeErrorKind::RuntimeLimit => EvalError::LimitExceeded(message),
                _ => EvalError::Thrown(message),
            }
        }
        Err(_) => {
            let thrown = err
                .as_opaque()
                .and_then(|value| value.to_string(context).ok())
                .map(|text| text.to_std_string_escaped())
                .unwrap_or_else(|| err.to_string());
            EvalError::Thrown(thrown)
        }
    }
}
