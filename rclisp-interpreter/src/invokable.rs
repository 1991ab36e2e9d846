use rclisp_core::{Closure, LispError, Object, PrimitiveId, Value};

use crate::environment::Environment;
use crate::interpreter::Interpreter;

impl Interpreter {
    /// Applies a procedure to an (already evaluated) list of arguments.
    ///
    /// Neither the procedure nor the arguments are consumed: the caller keeps its references to both.
    /// The returned value is owned by the caller.
    pub fn apply(&mut self, procedure: Value, args: Value) -> Value {
        match self.heap.object(procedure) {
            Some(&Object::Primitive(id)) => self.invoke_primitive(id, args),
            Some(&Object::Closure(closure)) => {
                self.heap.grab(procedure);
                let result = self.invoke_closure(closure, args);
                self.heap.release(procedure);
                result
            }
            _ => self.fail(LispError::UnknownProcedure),
        }
    }

    fn invoke_primitive(&mut self, id: PrimitiveId, args: Value) -> Value {
        let function = match self.primitives.get(id.0) {
            Some((name, function)) => {
                tracing::trace!(primitive = name.as_str(), "invoke");
                *function
            }
            None => return self.fail(LispError::UnknownProcedure),
        };
        let result = function(self, args);
        self.settle(result)
    }

    fn invoke_closure(&mut self, closure: Closure, args: Value) -> Value {
        let received = self.heap.length(args);
        if self.heap.length(closure.params) != received {
            return self.fail(LispError::ArityMismatch(received));
        }

        let captured = match Environment::from_value(&self.heap, closure.env) {
            Some(env) => env,
            None => return self.fail(LispError::UnknownProcedure),
        };

        if closure.params.is_none() {
            return self.evaluate_progn(closure.body, captured);
        }

        let env = Environment::extend(&mut self.heap, closure.params, args, captured);
        self.heap.grab(env.value());
        let result = self.evaluate_progn(closure.body, env);
        self.heap.release(env.value());
        result
    }
}
