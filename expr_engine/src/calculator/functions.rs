//! Callable functions and their registry

use super::error::CalculationResult;
use super::variables::same_name;
use crate::variants::{Variant, VariantOperations};
use futures::future::{self, BoxFuture, FutureExt};

pub type FunctionFuture<'a> = BoxFuture<'a, CalculationResult<Variant>>;

/// Function callable from an expression
///
/// `calculate` receives the arguments in source order together with the
/// calculator's active operation strategy. It is the only place where
/// evaluation may suspend.
pub trait Function: Send + Sync {
    fn name(&self) -> &str;

    fn calculate<'a>(
        &'a self,
        params: &'a [Variant],
        operations: &'a dyn VariantOperations,
    ) -> FunctionFuture<'a>;
}

/// Synchronous function body
pub type FunctionBody =
    dyn Fn(&[Variant], &dyn VariantOperations) -> CalculationResult<Variant> + Send + Sync;

/// Function backed by a plain closure
pub struct DelegatedFunction {
    name: String,
    body: Box<FunctionBody>,
}

impl DelegatedFunction {
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&[Variant], &dyn VariantOperations) -> CalculationResult<Variant>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            body: Box::new(body),
        }
    }
}

impl Function for DelegatedFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn calculate<'a>(
        &'a self,
        params: &'a [Variant],
        operations: &'a dyn VariantOperations,
    ) -> FunctionFuture<'a> {
        future::ready((self.body)(params, operations)).boxed()
    }
}

impl std::fmt::Debug for DelegatedFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelegatedFunction")
            .field("name", &self.name)
            .finish()
    }
}

/// Ordered function registry with case-insensitive lookup
#[derive(Default)]
pub struct FunctionCollection {
    functions: Vec<Box<dyn Function>>,
}

impl FunctionCollection {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in library
    pub fn with_default_functions() -> Self {
        let mut collection = Self::new();
        super::builtin::register_defaults(&mut collection);
        collection
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Add a function, replacing one with the same name
    pub fn add(&mut self, function: impl Function + 'static) {
        self.add_boxed(Box::new(function));
    }

    pub fn add_boxed(&mut self, function: Box<dyn Function>) {
        match self.find_index(function.name()) {
            Some(index) => self.functions[index] = function,
            None => self.functions.push(function),
        }
    }

    pub fn get(&self, index: usize) -> Option<&dyn Function> {
        self.functions.get(index).map(|f| f.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.iter().map(|f| f.name())
    }

    pub fn find_index(&self, name: &str) -> Option<usize> {
        self.functions.iter().position(|f| same_name(f.name(), name))
    }

    pub fn find(&self, name: &str) -> Option<&dyn Function> {
        self.find_index(name).and_then(|index| self.get(index))
    }

    pub fn remove(&mut self, index: usize) -> Option<Box<dyn Function>> {
        (index < self.functions.len()).then(|| self.functions.remove(index))
    }

    pub fn remove_by_name(&mut self, name: &str) -> Option<Box<dyn Function>> {
        self.find_index(name).map(|index| self.functions.remove(index))
    }

    pub fn clear(&mut self) {
        self.functions.clear();
    }
}

impl std::fmt::Debug for FunctionCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variants::TypeUnsafeVariantOperations;
    use futures::executor::block_on;

    struct Echo;

    impl Function for Echo {
        fn name(&self) -> &str {
            "Echo"
        }

        fn calculate<'a>(
            &'a self,
            params: &'a [Variant],
            _operations: &'a dyn VariantOperations,
        ) -> FunctionFuture<'a> {
            async move { Ok(params.first().cloned().unwrap_or_default()) }.boxed()
        }
    }

    #[test]
    fn test_delegated_function() {
        let double = DelegatedFunction::new("Double", |params, ops| {
            Ok(ops.mul(&params[0], &Variant::Integer(2))?)
        });
        let ops = TypeUnsafeVariantOperations::new();

        assert_eq!(
            block_on(double.calculate(&[Variant::Integer(21)], &ops)),
            Ok(Variant::Integer(42))
        );
    }

    #[test]
    fn test_lookup_and_replace() {
        let mut functions = FunctionCollection::new();
        functions.add(Echo);
        functions.add(DelegatedFunction::new("echo", |_, _| Ok(Variant::Null)));

        assert_eq!(functions.len(), 1);
        assert_eq!(functions.find("ECHO").map(|f| f.name()), Some("echo"));
        assert!(functions.remove_by_name("Echo").is_some());
        assert!(functions.is_empty());
    }

    #[test]
    fn test_async_function() {
        let ops = TypeUnsafeVariantOperations::new();
        let params = [Variant::from_string("x")];

        assert_eq!(
            block_on(Echo.calculate(&params, &ops)),
            Ok(Variant::from_string("x"))
        );
    }

    #[test]
    fn test_default_library_is_registered() {
        let functions = FunctionCollection::with_default_functions();

        for name in ["Max", "max", "TIMESPAN", "Array", "Rnd", "Random", "Sqr", "Sqrt"] {
            assert!(functions.find(name).is_some(), "missing {}", name);
        }
    }
}
