//! Named values visible to an expression

use crate::variants::Variant;

/// Case-insensitive name comparison shared by the registries
pub(crate) fn same_name(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

/// Named mutable value
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Variable {
    name: String,
    value: Variant,
}

impl Variable {
    /// Variable holding Null
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_value(name, Variant::Null)
    }

    pub fn with_value(name: impl Into<String>, value: impl Into<Variant>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Variant {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<Variant>) {
        self.value = value.into();
    }
}

/// Ordered variable registry with case-insensitive lookup
#[derive(Debug, Clone, Default)]
pub struct VariableCollection {
    variables: Vec<Variable>,
}

impl VariableCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Add a variable, replacing one with the same name
    pub fn add(&mut self, variable: Variable) {
        match self.find_index(variable.name()) {
            Some(index) => self.variables[index] = variable,
            None => self.variables.push(variable),
        }
    }

    /// Set a value by name, creating the variable when missing
    pub fn set(&mut self, name: &str, value: impl Into<Variant>) {
        self.locate(name).set_value(value);
    }

    pub fn get(&self, index: usize) -> Option<&Variable> {
        self.variables.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter()
    }

    pub fn find_index(&self, name: &str) -> Option<usize> {
        self.variables
            .iter()
            .position(|v| same_name(v.name(), name))
    }

    pub fn find(&self, name: &str) -> Option<&Variable> {
        self.find_index(name).map(|index| &self.variables[index])
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Variable> {
        self.find_index(name).map(move |index| &mut self.variables[index])
    }

    /// Variable named `name`, added with a Null value when missing
    pub fn locate(&mut self, name: &str) -> &mut Variable {
        let index = match self.find_index(name) {
            Some(index) => index,
            None => {
                self.variables.push(Variable::new(name));
                self.variables.len() - 1
            }
        };
        &mut self.variables[index]
    }

    pub fn remove(&mut self, index: usize) -> Option<Variable> {
        (index < self.variables.len()).then(|| self.variables.remove(index))
    }

    pub fn remove_by_name(&mut self, name: &str) -> Option<Variable> {
        self.find_index(name).map(|index| self.variables.remove(index))
    }

    /// Reset every value to Null, keeping the names
    pub fn clear_values(&mut self) {
        for variable in &mut self.variables {
            variable.set_value(Variant::Null);
        }
    }

    pub fn clear(&mut self) {
        self.variables.clear();
    }
}

impl<'a> IntoIterator for &'a VariableCollection {
    type Item = &'a Variable;
    type IntoIter = std::slice::Iter<'a, Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.variables.iter()
    }
}

impl FromIterator<Variable> for VariableCollection {
    fn from_iter<I: IntoIterator<Item = Variable>>(iter: I) -> Self {
        let mut collection = Self::new();
        for variable in iter {
            collection.add(variable);
        }
        collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_lookup() {
        let mut variables = VariableCollection::new();
        variables.add(Variable::with_value("Total", 10));

        assert_eq!(variables.find("TOTAL").map(Variable::value), Some(&Variant::Integer(10)));
        assert_eq!(variables.find_index("total"), Some(0));
        assert!(variables.find("missing").is_none());
    }

    #[test]
    fn test_add_replaces_same_name() {
        let mut variables = VariableCollection::new();
        variables.add(Variable::with_value("a", 1));
        variables.add(Variable::with_value("b", 2));
        variables.add(Variable::with_value("A", 3));

        assert_eq!(variables.len(), 2);
        assert_eq!(variables.get(0).map(Variable::name), Some("A"));
        assert_eq!(variables.get(0).map(Variable::value), Some(&Variant::Integer(3)));
    }

    #[test]
    fn test_locate_and_set() {
        let mut variables = VariableCollection::new();
        variables.set("x", "hello");
        variables.locate("X").set_value(5);

        assert_eq!(variables.len(), 1);
        assert_eq!(variables.find("x").map(Variable::value), Some(&Variant::Integer(5)));

        variables.clear_values();
        assert_eq!(variables.find("x").map(Variable::value), Some(&Variant::Null));
    }

    #[test]
    fn test_remove() {
        let mut variables: VariableCollection =
            vec![Variable::new("a"), Variable::new("b")].into_iter().collect();

        assert_eq!(variables.remove_by_name("B").map(|v| v.name().to_string()), Some("b".to_string()));
        assert!(variables.remove(5).is_none());
        assert!(variables.remove(0).is_some());
        assert!(variables.is_empty());
    }
}
