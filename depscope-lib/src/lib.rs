/*!
`depscope-lib` is a library to build, query and output bounded dependency graphs of packages in
a package repository. It is used as the backend of the `depscope` CLI tool.

A graph is built breadth-first from a root package by asking a [`source::DependencySource`]
for each package's dependencies, up to a maximum depth. Packages whose name contains a filter
substring are kept as leaves and not explored. The finished [`graph::Graph`] can be queried for
reverse dependencies and rendered as an ASCII tree ([`tree::output_tree`]) or in DOT format
([`dot::output_dot`]).

Sources are provided for `APKINDEX` package indexes ([`index::PackageIndex`]) and flat
`name: dep dep` repository files ([`repo::FlatRepository`]); any
`Fn(&str, Option<&str>) -> Result<Vec<String>, SourceError>` closure is a source too.

# Example

```
use depscope_lib::graph::GraphBuilder;
use depscope_lib::repo::FlatRepository;
use depscope_lib::tree::output_tree;

let repo = FlatRepository::parse("app: libssl zlib\nlibssl: zlib\nzlib:");

// Explore two levels deep, without descending into anything named like "ssl".
let graph = GraphBuilder::new(2).filter(Some("ssl")).build("app", None, &repo);

assert_eq!(graph.dependencies("app"), Some(vec!["libssl", "zlib"]));
assert_eq!(graph.dependencies("libssl"), Some(vec![]));
assert_eq!(graph.reverse_dependencies("zlib"), vec!["app"]);

assert_eq!(
    output_tree(&graph, "app"),
    "app\n├── libssl\n└── zlib\n"
);
```
*/

pub mod coloring;
pub mod dot;
pub mod error;
pub mod graph;
pub mod index;
pub mod repo;
pub mod source;
pub mod template;
pub mod tree;
