use rclisp_core::{LispError, Object, Value};

use crate::environment::Environment;
use crate::interpreter::{Interpreter, SpecialForm};

/// Returns early with the value if it is an error, releasing the given owned values beforehand.
macro_rules! propagate {
    ($interpreter:expr, $value:expr $(, $held:expr)* $(,)?) => {{
        let value = $value;
        if $interpreter.heap.is_error(value) {
            $($interpreter.heap.release($held);)*
            return value;
        }
        value
    }};
}

impl Interpreter {
    /// Evaluates an expression within an environment.
    ///
    /// The returned value is owned by the caller, who is responsible for releasing it.
    /// Failures are reported as error values, never as panics.
    pub fn evaluate(&mut self, expr: Value, env: Environment) -> Value {
        match self.heap.object(expr) {
            Some(Object::Cons(_)) => {}
            Some(Object::Symbol(_)) => return self.evaluate_symbol(expr, env),
            _ => return self.heap.grab(expr),
        }

        // A form may rewrite itself (through `RPLACA`/`RPLACD`) while it runs.
        self.heap.grab(expr);
        let result = self.evaluate_form(expr, env);
        self.heap.release(expr);
        result
    }

    /// Evaluates a compound form, which the caller holds for the duration of the call.
    ///
    /// Sub-expressions are read again from `expr` after every nested evaluation.
    fn evaluate_form(&mut self, expr: Value, env: Environment) -> Value {
        let head = self.heap.head(expr);
        let form = match self.keywords.classify(head) {
            Some(form) => form,
            None => return self.evaluate_application(expr, env),
        };

        let length = self.heap.length(expr);
        let valid = match form {
            SpecialForm::Quote => length == 2,
            SpecialForm::Setq | SpecialForm::Label => length == 3,
            SpecialForm::If => length == 4,
            SpecialForm::Cond => length >= 2,
            SpecialForm::Let | SpecialForm::Lambda => length >= 3,
            SpecialForm::Progn => true,
        };
        if !valid {
            return self.fail(LispError::WrongArgumentCount(form.name().to_string()));
        }

        match form {
            SpecialForm::Quote => self.heap.grab(self.heap.nth(expr, 1)),
            SpecialForm::Setq => {
                let value = propagate!(self, self.evaluate(self.heap.nth(expr, 2), env));
                let name = self.heap.nth(expr, 1);
                let result = env.assign(&mut self.heap, name, value);
                let result = result.map(|value| self.heap.grab(value));
                self.heap.release(value);
                self.settle(result)
            }
            SpecialForm::Label => {
                let value = propagate!(self, self.evaluate(self.heap.nth(expr, 2), env));
                let name = self.heap.nth(expr, 1);
                let result = env.define(&mut self.heap, name, value);
                let result = result.map(|value| self.heap.grab(value));
                self.heap.release(value);
                self.settle(result)
            }
            SpecialForm::If => {
                let test = propagate!(self, self.evaluate(self.heap.nth(expr, 1), env));
                let branch = if test.is_some() {
                    self.heap.nth(expr, 2)
                } else {
                    self.heap.nth(expr, 3)
                };
                self.heap.release(test);
                self.evaluate(branch, env)
            }
            SpecialForm::Cond => self.evaluate_cond(self.heap.tail(expr), env),
            SpecialForm::Let => self.evaluate_let(expr, env),
            SpecialForm::Progn => self.evaluate_progn(self.heap.tail(expr), env),
            SpecialForm::Lambda => {
                let params = self.heap.nth(expr, 1);
                let body = self.heap.nth_tail(expr, 2);
                let closure = self.heap.closure(params, body, env.value());
                self.heap.grab(Some(closure))
            }
        }
    }

    fn evaluate_symbol(&mut self, symbol: Value, env: Environment) -> Value {
        let symbol = match symbol {
            Some(symbol) => symbol,
            None => return None,
        };
        match env.lookup(&self.heap, symbol) {
            Ok(binding) => {
                let value = self.heap.tail(Some(binding));
                self.heap.grab(value)
            }
            Err(error) => self.fail(error),
        }
    }

    fn evaluate_application(&mut self, expr: Value, env: Environment) -> Value {
        let procedure = propagate!(self, self.evaluate(self.heap.head(expr), env));
        let args = self.heap.tail(expr);

        let params = match self.heap.object(procedure) {
            Some(Object::Closure(closure)) => Some(closure.params),
            _ => None,
        };
        if let Some(params) = params {
            let received = self.heap.length(args);
            if self.heap.length(params) != received {
                self.heap.release(procedure);
                return self.fail(LispError::ArityMismatch(received));
            }
        }

        let exprs = self.heap.to_vec(args);
        let args = propagate!(self, self.evaluate_list(&exprs, env), procedure);
        let result = self.apply(procedure, args);
        self.heap.release(args);
        self.heap.release(procedure);
        result
    }

    /// Evaluates each expression in order, and collects the values into a fresh (owned) list.
    ///
    /// Stops at the first error, which is returned after releasing the values collected so far.
    pub fn evaluate_list(&mut self, exprs: &[Value], env: Environment) -> Value {
        for &expr in exprs {
            self.heap.grab(expr);
        }

        let mut values = Vec::with_capacity(exprs.len());
        let mut failure = None;
        for &expr in exprs {
            let value = self.evaluate(expr, env);
            if self.heap.is_error(value) {
                failure = Some(value);
                break;
            }
            values.push(value);
        }

        for &expr in exprs {
            self.heap.release(expr);
        }
        if let Some(error) = failure {
            for value in values {
                self.heap.release(value);
            }
            return error;
        }

        let list = self.heap.list(&values);
        self.heap.grab(list);
        for value in values {
            self.heap.release(value);
        }
        list
    }

    /// Evaluates a list of expressions in order, returning the value of the last one (`NIL` if there is none).
    ///
    /// The body is walked one cell at a time, holding the current cell, so that it may be rewritten as it runs.
    pub fn evaluate_progn(&mut self, body: Value, env: Environment) -> Value {
        let mut result = None;
        let mut cursor = self.heap.grab(body);
        while self.heap.is_cons(cursor) {
            self.heap.release(result);
            result = self.evaluate(self.heap.head(cursor), env);
            let next = self.heap.grab(self.heap.tail(cursor));
            self.heap.release(cursor);
            cursor = next;
            if self.heap.is_error(result) {
                break;
            }
        }
        self.heap.release(cursor);
        result
    }

    fn evaluate_cond(&mut self, clauses: Value, env: Environment) -> Value {
        let mut cursor = self.heap.grab(clauses);
        let mut result = None;
        while self.heap.is_cons(cursor) {
            let clause = self.heap.grab(self.heap.head(cursor));
            let outcome = self.evaluate_clause(clause, env);
            self.heap.release(clause);

            let next = self.heap.grab(self.heap.tail(cursor));
            self.heap.release(cursor);
            cursor = next;
            if let Some(value) = outcome {
                result = value;
                break;
            }
        }
        self.heap.release(cursor);
        result
    }

    /// Tries a single (held) `COND` clause: `None` if its test fails, or else the (owned) value of the clause.
    fn evaluate_clause(&mut self, clause: Value, env: Environment) -> Option<Value> {
        if !self.heap.is_cons(clause) {
            return Some(self.fail(LispError::BadCondClause));
        }

        let test = self.evaluate(self.heap.head(clause), env);
        if self.heap.is_error(test) {
            return Some(test);
        }
        if test.is_none() {
            return None;
        }

        // A clause without consequent yields `T`.
        self.heap.release(test);
        if self.heap.tail(clause).is_none() {
            return Some(self.truth(true));
        }
        Some(self.evaluate(self.heap.nth(clause, 1), env))
    }

    fn evaluate_let(&mut self, expr: Value, env: Environment) -> Value {
        let bindings = self.heap.to_vec(self.heap.nth(expr, 1));
        if bindings.is_empty() {
            return self.fail(LispError::EmptyLetBindings);
        }

        let mut names = Vec::with_capacity(bindings.len());
        let mut inits = Vec::with_capacity(bindings.len());
        for binding in bindings {
            if self.heap.length(binding) != 2 || self.heap.tail(self.heap.tail(binding)).is_some() {
                return self.fail(LispError::BadLetBinding);
            }
            names.push(self.heap.nth(binding, 0));
            inits.push(self.heap.nth(binding, 1));
        }

        let params = self.heap.list(&names);
        self.heap.grab(params);
        let values = propagate!(self, self.evaluate_list(&inits, env), params);

        let body = self.heap.nth_tail(expr, 2);
        let closure = self.heap.closure(params, body, env.value());
        let closure = self.heap.grab(Some(closure));
        let result = self.apply(closure, values);

        self.heap.release(closure);
        self.heap.release(values);
        self.heap.release(params);
        result
    }
}
