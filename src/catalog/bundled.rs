//! Project catalog compiled into the binary

pub const CATALOG: &str = r##"# Projects shown on the portfolio page, in display order.
#
# tags        - display labels; their slugs drive the filter buttons
# tech_stack  - short technology badges
# image       - file under images/ (optional)

[[project]]
name = "Gaussian Processes"
description = "Advanced probabilistic machine learning implementation using Gaussian Processes for regression and classification tasks with uncertainty quantification."
tags = ["AI/ML"]
tech_stack = ["Python", "Jupyter", "NumPy", "SciPy", "Matplotlib"]
image = "gaussian-processes.jpg"
links = { code = "https://github.com/JSerranom04/gaussian-processes" }

[[project]]
name = "Generative GMM"
description = "Generative Gaussian Mixture Models implementation for unsupervised learning, clustering, and density estimation with EM algorithm optimization."
tags = ["AI/ML"]
tech_stack = ["Python", "Jupyter", "Scikit-learn", "NumPy"]
image = "generative-gmm.jpg"
links = { code = "https://github.com/JSerranom04/generative-GMM" }

[[project]]
name = "Logistic Regression & Neural Networks"
description = "From-scratch implementation of logistic regression and neural networks with backpropagation, showcasing deep understanding of ML fundamentals."
tags = ["AI/ML"]
tech_stack = ["Python", "Jupyter", "NumPy", "Matplotlib"]
image = "neural-networks.jpg"
links = { code = "https://github.com/JSerranom04/logistic-regression-and-neural-networks" }

[[project]]
name = "Binary Logistic Regression"
description = "Mathematical implementation of binary logistic regression from scratch, demonstrating statistical learning theory and optimization techniques."
tags = ["AI/ML"]
tech_stack = ["Python", "Jupyter", "NumPy", "Statistics"]
image = "logistic-regression.jpg"
links = { code = "https://github.com/JSerranom04/binary-logistic-regression" }

[[project]]
name = "Compiler from Scratch (JavaCC)"
description = "Complete language processor implementation including lexical analysis, parsing, semantic analysis, and code generation using JavaCC framework."
tags = ["Compiler Design"]
tech_stack = ["Java", "JavaCC", "Compiler Design", "AST"]
image = "compiler-design.jpg"
links = { code = "https://github.com/JSerranom04/compiler-from-scratch-Javacc" }

[[project]]
name = "Raft Distributed Algorithm"
description = "Implementation of the Raft consensus algorithm for distributed systems, ensuring fault tolerance and consistency in distributed environments."
tags = ["Distributed Systems"]
tech_stack = ["Go", "Distributed Systems", "Consensus", "Networking"]
image = "raft-algorithm.jpg"
links = { code = "https://github.com/JSerranom04/raft-distributed-algorithm" }

[[project]]
name = "Ricart-Agrawala Writers-Readers"
description = "Implementation of the Ricart-Agrawala distributed mutual exclusion algorithm for coordinating writers and readers in distributed systems."
tags = ["Distributed Systems"]
tech_stack = ["Go", "Distributed Systems", "Concurrency", "Mutex"]
image = "distributed-mutex.jpg"
links = { code = "https://github.com/JSerranom04/ricart-agrawala-writters-readers" }

[[project]]
name = "Branch and Prune Algorithms"
description = "Implementation of branch-and-bound optimization algorithms with pruning techniques for solving complex combinatorial problems efficiently."
tags = ["Algorithms"]
tech_stack = ["Go", "Algorithms", "Optimization", "Data Structures"]
image = "branch-bound.jpg"
links = { code = "https://github.com/JSerranom04/branch-and-prune" }

[[project]]
name = "Python Message Broker"
description = "High-performance message broker implementation in Python supporting multiple messaging patterns and protocols for distributed communication."
tags = ["Software Engineering"]
tech_stack = ["Python", "Networking", "Message Queue", "Concurrency"]
image = "message-broker.jpg"
links = { code = "https://github.com/JSerranom04/py-message-broker" }

[[project]]
name = "Content-Aware Image Resizing"
description = "Implementation of seam carving algorithm for intelligent image resizing that preserves important visual content while removing less significant areas."
tags = ["Algorithms"]
tech_stack = ["Go", "Image Processing", "Computer Vision", "Algorithms"]
image = "seam-carving.jpg"
links = { code = "https://github.com/JSerranom04/content-aware-image-resizing" }

[[project]]
name = "Hamming Distance Calculator"
description = "Efficient implementation of Hamming distance calculation for error detection and correction in digital communications and bioinformatics."
tags = ["Algorithms"]
tech_stack = ["Go", "Bit Manipulation", "Error Detection", "Algorithms"]
image = "hamming-distance.jpg"
links = { code = "https://github.com/JSerranom04/hamming-distance" }

[[project]]
name = "Algorithmic Problem Collection"
description = "Comprehensive collection of algorithmic solutions covering dynamic programming, greedy algorithms, graph theory, and competitive programming."
tags = ["Algorithms"]
tech_stack = ["Python", "Algorithms", "Data Structures", "Problem Solving"]
image = "algorithms.jpg"
links = { code = "https://github.com/JSerranom04/algorithmic-problem-collection" }

[[project]]
name = "P2P2P Web Page"
description = "Peer-to-peer web application demonstrating distributed web technologies and decentralized communication protocols."
tags = ["Web"]
tech_stack = ["JavaScript", "P2P", "WebRTC", "Networking"]
image = "p2p-network.jpg"
links = { code = "https://github.com/JSerranom04/P2P2P-web-page" }
"##;
