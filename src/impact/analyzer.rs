//! Refactoring impact prediction
//!
//! Scans the code view of every file (comments and literal contents
//! blanked) for syntactic uses of the element an operation changes:
//!
//! | Operation      | Looks for                                                   |
//! |----------------|-------------------------------------------------------------|
//! | rename-class   | imports, `extends`, `implements`, other uses of the class   |
//! | extract-class  | same as rename-class, for the source class                  |
//! | rename-method  | overrides in subtypes of the class, call sites              |
//! | move-method    | call sites, overrides in subtypes, imports in calling files |
//! | extract-method | call sites, overrides in subtypes                           |
//!
//! Risk is a fixed priority: any inheritance or implementation impact is
//! HIGH; otherwise more than three call/type-usage impacts is MEDIUM.

use crate::detectors::{load_sources, FileProvider};
use crate::graph::{external_node, DependencyGraph, GraphBuilder};
use crate::impact::operation::RefactoringOperation;
use crate::impact::ripple::ripple_effect;
use crate::scanner::{find_word, ClassDecl, ClassKind, ScanOptions, SourceFile};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImpactType {
    MethodCall,
    Import,
    Inheritance,
    Implementation,
    TypeUsage,
}

impl ImpactType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactType::MethodCall => "METHOD_CALL",
            ImpactType::Import => "IMPORT",
            ImpactType::Inheritance => "INHERITANCE",
            ImpactType::Implementation => "IMPLEMENTATION",
            ImpactType::TypeUsage => "TYPE_USAGE",
        }
    }

    fn is_structural(&self) -> bool {
        matches!(self, ImpactType::Inheritance | ImpactType::Implementation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

/// One location the operation would touch
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ImpactedFile {
    pub file: String,
    pub line: u32,
    pub description: String,
    pub impact_type: ImpactType,
}

/// A reference from an impacted file to the changed element
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Dependency {
    pub source_file: String,
    pub target_file: String,
    pub dependency_type: ImpactType,
    pub element: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RippleImpactAnalysis {
    pub operation: RefactoringOperation,
    pub impacted_files: BTreeSet<ImpactedFile>,
    pub dependencies: BTreeSet<Dependency>,
    pub risk_level: RiskLevel,
    /// Transitive dependents of the declaring file, itself included
    pub ripple_files: BTreeSet<String>,
}

impl RippleImpactAnalysis {
    /// Distinct files with at least one impact
    pub fn affected_files(&self) -> BTreeSet<&str> {
        self.impacted_files.iter().map(|i| i.file.as_str()).collect()
    }

    pub fn count(&self, impact_type: ImpactType) -> usize {
        self.impacted_files
            .iter()
            .filter(|i| i.impact_type == impact_type)
            .count()
    }
}

/// Risk of a set of impacts: structural impacts dominate any usage count
pub fn classify_risk<'a>(impacts: impl IntoIterator<Item = &'a ImpactedFile>) -> RiskLevel {
    let mut usages = 0usize;
    for impact in impacts {
        if impact.impact_type.is_structural() {
            return RiskLevel::High;
        }
        if matches!(impact.impact_type, ImpactType::MethodCall | ImpactType::TypeUsage) {
            usages += 1;
        }
    }
    if usages > 3 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// A type declaration together with its file
struct TypeSite<'a> {
    file: &'a SourceFile,
    class: &'a ClassDecl,
}

/// Predicts the effect of refactoring operations over a fixed set of files.
///
/// Owns the parsed sources and a dependency graph built from them; both
/// stay unchanged for the analyzer's lifetime.
pub struct ImpactAnalyzer {
    sources: Vec<Arc<SourceFile>>,
    graph: DependencyGraph,
}

impl ImpactAnalyzer {
    pub fn new(sources: Vec<Arc<SourceFile>>, graph: DependencyGraph) -> Self {
        Self { sources, graph }
    }

    /// Load every file of `provider` and build the graph before any query
    pub fn from_provider(provider: &dyn FileProvider, options: &ScanOptions) -> Self {
        let sources: Vec<Arc<SourceFile>> = load_sources(provider, provider.files(), options)
            .into_iter()
            .filter_map(|l| l.source.ok())
            .collect();
        let graph = GraphBuilder::new(options.clone()).build_from_sources(&sources);
        Self::new(sources, graph)
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn sources(&self) -> &[Arc<SourceFile>] {
        &self.sources
    }

    pub fn ripple_effect(&self, file: &str) -> BTreeSet<String> {
        ripple_effect(&self.graph, file)
    }

    /// Predict which files `operation` touches and how risky it is
    pub fn analyze(&self, operation: &RefactoringOperation) -> RippleImpactAnalysis {
        let class = operation.declaring_class();
        let declaring_file = self.declaring_file(class, operation.target_file());

        let impacted: BTreeSet<ImpactedFile> = match operation {
            RefactoringOperation::RenameClass { old_name, .. } => self.class_impacts(old_name),
            RefactoringOperation::ExtractClass { source_class, .. } => {
                self.class_impacts(source_class)
            }
            RefactoringOperation::RenameMethod {
                target_class,
                old_name,
                ..
            } => {
                let mut impacts = self.override_impacts(target_class, old_name);
                impacts.extend(self.call_impacts(old_name));
                impacts
            }
            RefactoringOperation::ExtractMethod {
                target_class,
                target_method,
                ..
            } => {
                let mut impacts = self.call_impacts(target_method);
                impacts.extend(self.override_impacts(target_class, target_method));
                impacts
            }
            RefactoringOperation::MoveMethod {
                source_class,
                target_method,
                ..
            } => {
                let call_sites = self.call_impacts(target_method);
                let callers: HashSet<&str> = call_sites.iter().map(|c| c.file.as_str()).collect();
                let imports: Vec<ImpactedFile> = self
                    .import_impacts(source_class)
                    .into_iter()
                    .filter(|i| callers.contains(i.file.as_str()))
                    .collect();
                let mut impacts = self.override_impacts(source_class, target_method);
                impacts.extend(imports);
                impacts.extend(call_sites);
                impacts
            }
        };

        let dependencies = impacted
            .iter()
            .map(|impact| Dependency {
                source_file: impact.file.clone(),
                target_file: declaring_file.clone(),
                dependency_type: impact.impact_type,
                element: operation.element().to_string(),
            })
            .collect();

        let risk_level = classify_risk(&impacted);
        let ripple_files = self.ripple_effect(&declaring_file);
        info!(
            "{} of {}: {} impacts in {} files, risk {}",
            operation.kind(),
            operation.element(),
            impacted.len(),
            impacted.iter().map(|i| i.file.as_str()).collect::<HashSet<_>>().len(),
            risk_level.as_str()
        );

        RippleImpactAnalysis {
            operation: operation.clone(),
            impacted_files: impacted,
            dependencies,
            risk_level,
            ripple_files,
        }
    }

    /// File declaring `class`, preferring `hint`; external bucket when unknown
    fn declaring_file(&self, class: &str, hint: Option<&str>) -> String {
        let mut candidates = self
            .sources
            .iter()
            .filter(|s| s.structure().class_named(class).is_some())
            .map(|s| s.path());
        let first = candidates.next();
        if let Some(hint) = hint {
            if first == Some(hint) || candidates.any(|p| p == hint) {
                return hint.to_string();
            }
        }
        first.map(str::to_string).unwrap_or_else(|| external_node(class))
    }

    fn type_sites(&self) -> impl Iterator<Item = TypeSite<'_>> {
        self.sources.iter().flat_map(|file| {
            let file: &SourceFile = file;
            file.structure()
                .classes
                .iter()
                .map(move |class| TypeSite { file, class })
        })
    }

    /// Direct and transitive subtypes of `class`, with how the first link is made
    fn subtypes(&self, class: &str) -> Vec<(TypeSite<'_>, ImpactType)> {
        let mut found = Vec::new();
        let mut seen: HashSet<(String, u32)> = HashSet::new();
        let mut queue = VecDeque::from([(class.to_string(), true)]);

        while let Some((parent, direct)) = queue.pop_front() {
            for site in self.type_sites() {
                let Some(link) = supertype_link(site.class, &parent) else {
                    continue;
                };
                if !seen.insert((site.file.path().to_string(), site.class.start_line)) {
                    continue;
                }
                let link = if direct { link } else { ImpactType::Inheritance };
                queue.push_back((site.class.name.clone(), false));
                found.push((site, link));
            }
        }
        found
    }

    /// Overriding declarations of `method` in subtypes of `class`
    fn override_impacts(&self, class: &str, method: &str) -> BTreeSet<ImpactedFile> {
        self.subtypes(class)
            .into_iter()
            .flat_map(|(site, link)| {
                site.class
                    .methods
                    .iter()
                    .filter(move |m| m.name == method && !m.is_constructor)
                    .map(move |m| ImpactedFile {
                        file: site.file.path().to_string(),
                        line: m.signature_line,
                        description: format!(
                            "{} overrides {}() from {}",
                            site.class.name, method, class
                        ),
                        impact_type: link,
                    })
            })
            .collect()
    }

    /// Call sites `method(` outside the method's own declarations
    fn call_impacts(&self, method: &str) -> BTreeSet<ImpactedFile> {
        self.sources
            .par_iter()
            .flat_map_iter(|file| {
                let declarations: HashSet<u32> = file
                    .structure()
                    .methods()
                    .filter(|(_, m)| m.name == method)
                    .map(|(_, m)| m.signature_line)
                    .collect();
                file.code_lines()
                    .iter()
                    .enumerate()
                    .filter(move |(i, line)| {
                        !declarations.contains(&((i + 1) as u32)) && calls(line, method)
                    })
                    .map(move |(i, _)| ImpactedFile {
                        file: file.path().to_string(),
                        line: (i + 1) as u32,
                        description: format!("calls {}()", method),
                        impact_type: ImpactType::MethodCall,
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Imports naming `class` as the imported type
    fn import_impacts(&self, class: &str) -> Vec<ImpactedFile> {
        self.sources
            .iter()
            .flat_map(|file| {
                file.structure()
                    .imports
                    .iter()
                    .filter(|import| import.type_path().rsplit('.').next() == Some(class))
                    .map(move |import| ImpactedFile {
                        file: file.path().to_string(),
                        line: import.line,
                        description: format!("imports {}", import.path),
                        impact_type: ImpactType::Import,
                    })
            })
            .collect()
    }

    /// Every use of `class`: imports, supertype clauses and other mentions
    fn class_impacts(&self, class: &str) -> BTreeSet<ImpactedFile> {
        let mut impacts: BTreeSet<ImpactedFile> = self.import_impacts(class).into_iter().collect();

        for site in self.type_sites() {
            if let Some(link) = supertype_link(site.class, class) {
                let verb = match link {
                    ImpactType::Implementation => "implements",
                    _ => "extends",
                };
                impacts.insert(ImpactedFile {
                    file: site.file.path().to_string(),
                    line: site.class.start_line,
                    description: format!("{} {} {}", site.class.name, verb, class),
                    impact_type: link,
                });
            }
        }

        let usages: Vec<ImpactedFile> = self
            .sources
            .par_iter()
            .flat_map_iter(|file| {
                let structure = file.structure();
                let skip: HashSet<u32> = structure
                    .imports
                    .iter()
                    .map(|i| i.line)
                    .chain(
                        structure
                            .classes
                            .iter()
                            .filter(|c| c.name == class)
                            .map(|c| c.start_line),
                    )
                    .collect();
                file.code_lines()
                    .iter()
                    .enumerate()
                    .filter(move |(i, line)| {
                        !skip.contains(&((i + 1) as u32)) && mentions_type(line, class)
                    })
                    .map(move |(i, _)| ImpactedFile {
                        file: file.path().to_string(),
                        line: (i + 1) as u32,
                        description: format!("uses type {}", class),
                        impact_type: ImpactType::TypeUsage,
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        debug!("{} type usages of {}", usages.len(), class);
        impacts.extend(usages);
        impacts
    }
}

/// How `class` names `parent` among its supertypes, by simple name
fn supertype_link(class: &ClassDecl, parent: &str) -> Option<ImpactType> {
    let simple = |name: &str| name.rsplit('.').next().unwrap_or(name).to_string();
    if class.superclass.as_deref().map(simple).as_deref() == Some(parent) {
        return Some(ImpactType::Inheritance);
    }
    if class.interfaces.iter().any(|i| simple(i) == parent) {
        // Interfaces list their super-interfaces after `extends`
        return Some(match class.kind {
            ClassKind::Interface => ImpactType::Inheritance,
            _ => ImpactType::Implementation,
        });
    }
    None
}

/// Whether `line` mentions `name` other than as a declared supertype
fn mentions_type(line: &str, name: &str) -> bool {
    let mut from = 0;
    while let Some(pos) = find_word(line, name, from) {
        if !names_supertype(line, pos, name) {
            return true;
        }
        from = pos + name.len();
    }
    false
}

/// Whether the mention at `pos` is itself a supertype: after a top-level
/// `extends` or `implements`, outside type arguments and not a qualifier
/// such as `Foo.Inner`
fn names_supertype(line: &str, pos: usize, name: &str) -> bool {
    let prefix = &line[..pos];
    if angle_depth(prefix) != 0 || line[pos + name.len()..].trim_start().starts_with('.') {
        return false;
    }
    ["extends", "implements"].iter().any(|kw| {
        let mut from = 0;
        while let Some(at) = find_word(prefix, kw, from) {
            if angle_depth(&prefix[..at]) == 0 {
                return true;
            }
            from = at + kw.len();
        }
        false
    })
}

/// Open `<` nesting at the end of `text`
fn angle_depth(text: &str) -> usize {
    text.chars().fold(0, |depth: usize, c| match c {
        '<' => depth + 1,
        '>' => depth.saturating_sub(1),
        _ => depth,
    })
}

/// Whether `line` calls `method`: the name followed by `(`
fn calls(line: &str, method: &str) -> bool {
    let mut from = 0;
    while let Some(pos) = find_word(line, method, from) {
        let after = &line[pos + method.len()..];
        let before = line[..pos].trim_end();
        // `new Name(` is a constructor call, not a method call
        if after.trim_start().starts_with('(') && !before.ends_with("new") {
            return true;
        }
        from = pos + method.len();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::MemoryFiles;
    use crate::impact::operation::OperationRequest;

    fn analyzer(entries: Vec<(&str, &str)>) -> ImpactAnalyzer {
        ImpactAnalyzer::from_provider(&MemoryFiles::new(entries), &ScanOptions::default())
    }

    fn rename_class(old: &str, new: &str) -> RefactoringOperation {
        RefactoringOperation::RenameClass {
            target_file: None,
            old_name: old.into(),
            new_name: new.into(),
        }
    }

    fn impact(file: &str, line: u32, impact_type: ImpactType) -> ImpactedFile {
        ImpactedFile {
            file: file.into(),
            line,
            description: String::new(),
            impact_type,
        }
    }

    #[test]
    fn test_rename_class_with_subclass_is_high_risk() {
        let analyzer = analyzer(vec![
            ("p/Foo.java", "package p;\npublic class Foo {\n    void run() {}\n}\n"),
            ("p/E.java", "package p;\nclass E extends Foo {\n}\n"),
        ]);
        let analysis = analyzer.analyze(&rename_class("Foo", "Bar"));
        assert!(analysis
            .impacted_files
            .iter()
            .any(|i| i.file == "p/E.java" && i.impact_type == ImpactType::Inheritance));
        assert_eq!(analysis.risk_level, RiskLevel::High);
        assert!(analysis.dependencies.iter().all(|d| d.target_file == "p/Foo.java"));
        assert!(analysis.ripple_files.contains("p/Foo.java"));
        assert!(analysis.ripple_files.contains("p/E.java"));
    }

    #[test]
    fn test_rename_class_finds_imports_and_usages() {
        let analyzer = analyzer(vec![
            ("src/a/Foo.java", "package a;\n/** Foo does things */\npublic class Foo {}\n"),
            (
                "src/b/User.java",
                "package b;\nimport a.Foo;\n\nclass User implements Runnable {\n    // Foo in a comment\n    private Foo foo = new Foo();\n    public void run() { String s = \"Foo\"; }\n}\n",
            ),
        ]);
        let analysis = analyzer.analyze(&rename_class("Foo", "Bar"));
        let user: Vec<_> = analysis
            .impacted_files
            .iter()
            .filter(|i| i.file == "src/b/User.java")
            .map(|i| (i.line, i.impact_type))
            .collect();
        assert_eq!(user, vec![(2, ImpactType::Import), (6, ImpactType::TypeUsage)]);
        // The declaration and its comment are not impacts
        assert!(!analysis.impacted_files.iter().any(|i| i.file == "src/a/Foo.java"));
        assert_eq!(analysis.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_rename_method_overrides_and_calls() {
        let analyzer = analyzer(vec![
            ("Shape.java", "public interface Shape {\n    double area();\n}\n"),
            (
                "Circle.java",
                "public class Circle implements Shape {\n    public double area() { return 3.14; }\n}\n",
            ),
            (
                "Report.java",
                "class Report {\n    double sum(Shape s) {\n        return s.area() + s.area();\n    }\n}\n",
            ),
        ]);
        let mut req = OperationRequest::new("rename-method");
        req.target_class = Some("Shape".into());
        req.old_name = Some("area".into());
        req.new_name = Some("surface".into());
        let op = RefactoringOperation::try_from(&req).expect("valid");

        let analysis = analyzer.analyze(&op);
        assert!(analysis.impacted_files.contains(&ImpactedFile {
            file: "Circle.java".into(),
            line: 2,
            description: "Circle overrides area() from Shape".into(),
            impact_type: ImpactType::Implementation,
        }));
        assert_eq!(analysis.count(ImpactType::MethodCall), 1);
        assert_eq!(analysis.risk_level, RiskLevel::High);
        assert!(analysis
            .dependencies
            .iter()
            .all(|d| d.element == "area" && d.target_file == "Shape.java"));
    }

    #[test]
    fn test_move_method_imports_only_in_calling_files() {
        let analyzer = analyzer(vec![
            (
                "src/m/Order.java",
                "package m;\npublic class Order {\n    public int total() { return 1; }\n}\n",
            ),
            (
                "src/x/Cart.java",
                "package x;\nimport m.Order;\nclass Cart {\n    int t(Order o) { return o.total(); }\n}\n",
            ),
            (
                "src/x/Audit.java",
                "package x;\nimport m.Order;\nclass Audit {\n    Order last;\n}\n",
            ),
        ]);
        let op = RefactoringOperation::MoveMethod {
            target_file: None,
            source_class: "Order".into(),
            target_class: "Invoice".into(),
            target_method: "total".into(),
        };
        let analysis = analyzer.analyze(&op);
        let files = analysis.affected_files();
        assert!(files.contains("src/x/Cart.java"));
        assert!(!files.contains("src/x/Audit.java"));
        assert_eq!(analysis.count(ImpactType::Import), 1);
        assert_eq!(analysis.count(ImpactType::MethodCall), 1);
        assert_eq!(analysis.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_many_call_sites_are_medium_risk() {
        let analyzer = analyzer(vec![
            ("Util.java", "public class Util {\n    public static int calc() { return 1; }\n}\n"),
            (
                "App.java",
                "class App {\n    int a() { return Util.calc(); }\n    int b() { return Util.calc(); }\n    int c() { return Util.calc(); }\n    int d() { return Util.calc(); }\n}\n",
            ),
        ]);
        let op = RefactoringOperation::ExtractMethod {
            target_file: None,
            target_class: "Util".into(),
            target_method: "calc".into(),
            new_name: Some("compute".into()),
        };
        let analysis = analyzer.analyze(&op);
        assert_eq!(analysis.count(ImpactType::MethodCall), 4);
        assert_eq!(analysis.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_unknown_class_targets_external_bucket() {
        let analyzer = analyzer(vec![("A.java", "class A {\n    Ghost g;\n}\n")]);
        let op = RefactoringOperation::ExtractClass {
            target_file: None,
            source_class: "Ghost".into(),
            extracted_class: "Spirit".into(),
        };
        let analysis = analyzer.analyze(&op);
        assert_eq!(analysis.count(ImpactType::TypeUsage), 1);
        assert!(analysis
            .dependencies
            .iter()
            .all(|d| d.target_file == "external/Ghost.java"));
        assert!(analysis.ripple_files.contains("external/Ghost.java"));
    }

    #[test]
    fn test_structural_impact_dominates_usage_count() {
        let mut impacts: Vec<ImpactedFile> =
            (1..=10).map(|l| impact("A.java", l, ImpactType::MethodCall)).collect();
        assert_eq!(classify_risk(&impacts), RiskLevel::Medium);
        impacts.push(impact("B.java", 1, ImpactType::Implementation));
        assert_eq!(classify_risk(&impacts), RiskLevel::High);
        assert_eq!(classify_risk(&[impact("A.java", 1, ImpactType::Import)]), RiskLevel::Low);
    }

    #[test]
    fn test_rename_class_finds_type_arguments_in_supertype_clause() {
        let analyzer = analyzer(vec![
            ("p/Foo.java", "package p;\npublic class Foo {}\n"),
            ("p/Box.java", "package p;\nclass Box<T> {}\n"),
            (
                "p/E.java",
                "package p;\nclass E extends Box<Foo> implements Comparable<Foo> {\n}\n",
            ),
        ]);
        let analysis = analyzer.analyze(&rename_class("Foo", "Bar"));
        let e: Vec<_> = analysis
            .impacted_files
            .iter()
            .filter(|i| i.file == "p/E.java")
            .collect();
        assert_eq!(e.len(), 1);
        assert_eq!(e[0].line, 2);
        assert_eq!(e[0].impact_type, ImpactType::TypeUsage);
        assert_eq!(analysis.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_supertype_mentions_are_not_type_usages() {
        assert!(!mentions_type("class E extends Foo {", "Foo"));
        assert!(!mentions_type("class E implements Runnable, Foo {", "Foo"));
        assert!(mentions_type("class E extends Box<Foo> {", "Foo"));
        assert!(mentions_type("class E<T extends Foo> {", "Foo"));
        assert!(mentions_type("class E extends Foo.Inner {", "Foo"));
        assert!(mentions_type("class E extends Foo implements Sink<Foo> {", "Foo"));
        assert!(mentions_type("List<? extends Foo> items;", "Foo"));
        assert!(!mentions_type("class E extends Bar {", "Foo"));
    }

    #[test]
    fn test_calls_helper() {
        assert!(calls("return s.area() + 1;", "area"));
        assert!(calls("area ();", "area"));
        assert!(!calls("double area;", "area"));
        assert!(!calls("Foo f = new Foo();", "Foo"));
        assert!(!calls("surfaceArea();", "area"));
    }
}
