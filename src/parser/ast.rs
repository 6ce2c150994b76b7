use crate::midcode::Operand;
use crate::token::Token;

/// Grammar nonterminals that label interior nodes of the syntax tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    Program,
    ConstDeclare,
    ConstDefine,
    VariableDeclare,
    VariableDefine,
    ReturnFunction,
    VoidFunction,
    MainFunction,
    HeadState,
    ParameterTable,
    CompositeSentence,
    SentenceCollection,
    Sentence,
    IfSentence,
    LoopSentence,
    Condition,
    Step,
    AssignSentence,
    ReturnCallSentence,
    VoidCallSentence,
    ValueParameterTable,
    ScanfSentence,
    PrintfSentence,
    ReturnSentence,
    Expression,
    Item,
    Factor,
    Integer,
    UnsignedInteger,
    StringLiteral,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeLabel {
    Rule(Rule),
    Token(Token),
}

/// Strictly owned tree built while parsing. A subtree that computes a value
/// records the operand holding it once the subtree is closed, so its parent
/// can read it without walking the children again.
#[derive(Clone, Debug, PartialEq)]
pub struct SyntaxNode {
    pub label: NodeLabel,
    pub children: Vec<SyntaxNode>,
    operand: Option<Operand>,
}

impl SyntaxNode {
    pub fn new(rule: Rule) -> Self {
        Self {
            label: NodeLabel::Rule(rule),
            children: vec![],
            operand: None,
        }
    }

    pub fn leaf(token: Token) -> Self {
        Self {
            label: NodeLabel::Token(token),
            children: vec![],
            operand: None,
        }
    }

    pub fn rule(&self) -> Option<Rule> {
        match self.label {
            NodeLabel::Rule(rule) => Some(rule),
            NodeLabel::Token(_) => None,
        }
    }

    /// Opens a child nonterminal and returns it for the caller to fill.
    pub fn add_rule(&mut self, rule: Rule) -> &mut SyntaxNode {
        self.children.push(SyntaxNode::new(rule));
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    pub fn add_token(&mut self, token: Token) {
        self.children.push(SyntaxNode::leaf(token));
    }

    pub fn operand(&self) -> Option<&Operand> {
        self.operand.as_ref()
    }

    pub fn set_operand(&mut self, operand: Operand) {
        debug_assert!(self.operand.is_none(), "operand annotated twice");
        self.operand = Some(operand);
    }

    /// Depth-first search for the first node labelled `rule`.
    pub fn find(&self, rule: Rule) -> Option<&SyntaxNode> {
        if self.rule() == Some(rule) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(rule))
    }

    pub fn count(&self, rule: Rule) -> usize {
        let own = usize::from(self.rule() == Some(rule));
        own + self.children.iter().map(|c| c.count(rule)).sum::<usize>()
    }

    /// Consumed tokens in source order.
    pub fn tokens(&self) -> Vec<&Token> {
        let mut tokens = vec![];
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let NodeLabel::Token(t) = &node.label {
                tokens.push(t);
            }
            stack.extend(node.children.iter().rev());
        }
        tokens
    }
}
