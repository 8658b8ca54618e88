use std::sync::Arc;

use super::parse::{RuleCall, Token, tokenize};
use super::{Check, DivePlan, FieldPlan, PlanSource};
use crate::error::{Error, Result};
use crate::registry::RuleRegistry;

/// Compiles `spec` against `registry`.
///
/// Fails with [`Error::MalformedRuleSpec`] on grammar violations and
/// [`Error::UnknownRule`] on names the registry does not know.
pub fn compile(spec: &str, registry: &RuleRegistry) -> Result<FieldPlan> {
    let tokens = tokenize(spec)?;
    let mut compiler = Compiler {
        spec,
        tokens: &tokens,
        pos: 0,
        registry,
    };
    compiler.level(Scope::Value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Value,
    Keys,
}

struct Compiler<'a> {
    spec: &'a str,
    tokens: &'a [Token],
    pos: usize,
    registry: &'a RuleRegistry,
}

impl Compiler<'_> {
    fn level(&mut self, scope: Scope) -> Result<FieldPlan> {
        let tokens = self.tokens;
        let start = self.pos;
        let mut plan = FieldPlan::default();

        while let Some(token) = tokens.get(self.pos) {
            match token {
                Token::OmitEmpty => {
                    if self.pos != start {
                        return Err(self.malformed("'omitempty' must be the first rule of its level"));
                    }
                    plan.omit_empty = true;
                }
                Token::Group { raw, calls } => plan.checks.extend(self.checks(raw, calls)?),
                Token::Dive => {
                    if scope == Scope::Keys {
                        return Err(self.malformed("'dive' is not allowed inside a keys block"));
                    }
                    self.pos += 1;
                    plan.dive = Some(Box::new(self.dive()?));
                    return Ok(plan);
                }
                Token::Keys => {
                    return Err(self.malformed("'keys' must directly follow 'dive'"));
                }
                Token::EndKeys => {
                    if scope == Scope::Keys {
                        return Ok(plan);
                    }
                    return Err(self.malformed("'endkeys' without matching 'keys'"));
                }
            }
            self.pos += 1;
        }

        if scope == Scope::Keys {
            return Err(self.malformed("'keys' without matching 'endkeys'"));
        }
        Ok(plan)
    }

    fn dive(&mut self) -> Result<DivePlan> {
        let mut keys = None;
        if matches!(self.tokens.get(self.pos), Some(Token::Keys)) {
            self.pos += 1;
            keys = Some(self.level(Scope::Keys)?);
            // step over `endkeys`
            self.pos += 1;
            // a lone `dive` after `endkeys` only separates key rules from value rules
            if matches!(self.tokens.get(self.pos), Some(Token::Dive)) {
                self.pos += 1;
            }
        }
        let elements = self.level(Scope::Value)?;
        Ok(DivePlan { keys, elements })
    }

    fn checks(&self, raw: &str, calls: &[RuleCall]) -> Result<Vec<Check>> {
        let groups = self.registry.expand_group(self.spec, calls, 0)?;
        let tag = match calls {
            [single] => single.name.as_str(),
            _ => raw,
        };
        Ok(groups
            .into_iter()
            .map(|alternatives| Check::new(tag.to_owned(), alternatives))
            .collect())
    }

    fn malformed(&self, reason: &str) -> Error {
        Error::malformed(self.spec, reason)
    }
}

impl PlanSource for RuleRegistry {
    fn plan(&self, spec: &str) -> Result<Arc<FieldPlan>> {
        compile(spec, self).map(Arc::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn names(plan: &FieldPlan) -> Vec<(&str, &str)> {
        plan.checks
            .iter()
            .map(|c| (c.tag.as_str(), c.actual_tag.as_str()))
            .collect()
    }

    #[test]
    fn test_plain_rules() {
        let registry = RuleRegistry::new();
        let plan = compile("required,min=5,max=25", &registry).unwrap();
        assert_eq!(
            names(&plan),
            [("required", "required"), ("min", "min"), ("max", "max")]
        );
        assert_eq!(plan.checks[1].param(), Some("5"));
        assert!(plan.dive.is_none());
    }

    #[test]
    fn test_map_with_key_block_and_separator() {
        let registry = RuleRegistry::new();
        let plan = compile("dive,keys,required,min=2,endkeys,dive", &registry).unwrap();
        let dive = plan.dive.as_ref().unwrap();
        assert_eq!(names(dive.keys.as_ref().unwrap()), [("required", "required"), ("min", "min")]);
        assert!(dive.elements.is_empty());
    }

    #[test]
    fn test_map_value_rules_without_separator() {
        let registry = RuleRegistry::new();
        let plan = compile("dive,keys,required,endkeys,required,gt=1000", &registry).unwrap();
        let dive = plan.dive.as_ref().unwrap();
        assert_eq!(names(&dive.elements), [("required", "required"), ("gt", "gt")]);
    }

    #[test]
    fn test_nested_dive() {
        let registry = RuleRegistry::new();
        let plan = compile("min=1,dive,dive,required", &registry).unwrap();
        let outer = plan.dive.as_ref().unwrap();
        let inner = outer.elements.dive.as_ref().unwrap();
        assert!(outer.elements.checks.is_empty());
        assert_eq!(names(&inner.elements), [("required", "required")]);
    }

    #[test]
    fn test_alias_keeps_alias_tag() {
        let mut registry = RuleRegistry::new();
        registry
            .register_alias("varchar", "required,min=5,max=25")
            .unwrap();
        let plan = compile("varchar", &registry).unwrap();
        assert_eq!(
            names(&plan),
            [("varchar", "required"), ("varchar", "min"), ("varchar", "max")]
        );
    }

    #[test]
    fn test_alternation_tag() {
        let registry = RuleRegistry::new();
        let plan = compile("required,email|numeric", &registry).unwrap();
        assert_eq!(names(&plan)[1], ("email|numeric", "email|numeric"));
        assert_eq!(plan.checks[1].param(), None);
    }

    #[test]
    fn test_omitempty_flag() {
        let registry = RuleRegistry::new();
        let plan = compile("omitempty,email", &registry).unwrap();
        assert!(plan.omit_empty);
        let plan = compile("dive,omitempty,min=2", &registry).unwrap();
        assert!(plan.dive.unwrap().elements.omit_empty);
    }

    #[rstest]
    #[case::keys_without_dive("keys,required,endkeys")]
    #[case::keys_without_endkeys("dive,keys,required")]
    #[case::endkeys_without_keys("dive,required,endkeys")]
    #[case::dive_inside_keys("dive,keys,dive,endkeys")]
    #[case::late_omitempty("required,omitempty")]
    #[case::missing_param("min")]
    #[case::param_on_flag_rule("required=1")]
    fn test_malformed(#[case] spec: &str) {
        let registry = RuleRegistry::new();
        assert!(matches!(
            compile(spec, &registry),
            Err(Error::MalformedRuleSpec { .. })
        ));
    }

    #[test]
    fn test_unknown_rule() {
        let registry = RuleRegistry::new();
        assert!(matches!(
            compile("required,username", &registry),
            Err(Error::UnknownRule { name }) if name == "username"
        ));
    }

    #[test]
    fn test_multi_rule_alias_in_alternation_is_malformed() {
        let mut registry = RuleRegistry::new();
        registry.register_alias("varchar", "required,min=5").unwrap();
        assert!(matches!(
            compile("varchar|email", &registry),
            Err(Error::MalformedRuleSpec { .. })
        ));
    }
}
