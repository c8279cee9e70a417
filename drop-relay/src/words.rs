//! Word list for generated secrets.
//!
//! 1024 short, common, lowercase English words. Three draws give 2^30
//! equally likely secrets.

/// Words secrets are drawn from.
pub const WORDS: &[&str] = &[
    "able", "about", "above", "accept", "across", "act", "add", "admit",
    "adult", "afraid", "after", "again", "age", "agent", "agree", "ahead",
    "aim", "air", "alarm", "album", "alert", "alike", "alive", "allow",
    "alone", "along", "alpha", "amber", "among", "amount", "anchor", "angle",
    "animal", "ankle", "answer", "apple", "april", "arch", "arena", "argue",
    "arise", "armor", "army", "arrow", "art", "ask", "atom", "attic",
    "august", "aunt", "author", "autumn", "avoid", "awake", "award", "away",
    "axis", "baby", "bacon", "badge", "bag", "bake", "ball", "bamboo",
    "banana", "band", "bank", "barn", "base", "basin", "beach", "beam",
    "bean", "bear", "beard", "beast", "bed", "bee", "beef", "began",
    "begin", "bell", "belt", "bench", "berry", "best", "bike", "bird",
    "birth", "black", "blade", "blame", "blank", "blast", "blend", "bless",
    "blind", "block", "blood", "bloom", "blue", "blur", "board", "boat",
    "body", "boil", "bold", "bolt", "bone", "bonus", "book", "boost",
    "boot", "boss", "bowl", "box", "brain", "brass", "brave", "bread",
    "brick", "brief", "bring", "broad", "brook", "broom", "brown", "brush",
    "build", "bulb", "bulk", "bunny", "burst", "bus", "bush", "busy",
    "buyer", "buzz", "cabin", "cable", "cage", "cake", "call", "calm",
    "camel", "camp", "canal", "candy", "canoe", "cape", "car", "card",
    "cargo", "cart", "case", "cash", "cat", "catch", "cause", "cave",
    "cedar", "cell", "chair", "chalk", "chase", "cheap", "check", "chef",
    "chess", "chest", "chief", "child", "cider", "city", "civil", "claim",
    "clap", "clay", "clean", "clerk", "cliff", "climb", "clock", "close",
    "cloth", "cloud", "clown", "club", "clue", "coach", "coast", "coat",
    "cobra", "cocoa", "code", "coil", "coin", "cold", "comet", "coral",
    "core", "corn", "couch", "cover", "crab", "craft", "crane", "crazy",
    "cream", "creek", "crew", "crisp", "crop", "cross", "crowd", "crown",
    "crumb", "crush", "cube", "cup", "curve", "cycle", "dad", "daisy",
    "damp", "dance", "dark", "dash", "data", "dawn", "day", "deal",
    "deck", "deer", "delta", "denim", "deny", "depth", "desk", "dial",
    "diary", "dish", "dizzy", "dog", "door", "dose", "dove", "dozen",
    "draft", "drama", "dream", "dress", "drift", "drill", "drink", "drip",
    "drive", "drop", "drum", "dry", "duck", "dune", "dust", "duty",
    "dwarf", "eager", "eagle", "early", "earth", "easel", "east", "easy",
    "echo", "edge", "egg", "eight", "elbow", "elder", "elite", "ember",
    "empty", "enact", "end", "enjoy", "enter", "entry", "envy", "epic",
    "equal", "erode", "essay", "event", "evoke", "exact", "exist", "exit",
    "extra", "eye", "face", "fact", "fade", "faint", "fair", "faith",
    "fall", "fame", "fancy", "farm", "fast", "fault", "feast", "fee",
    "fence", "ferry", "fever", "few", "fiber", "field", "fig", "film",
    "final", "find", "fire", "first", "fish", "fit", "five", "flag",
    "flame", "flash", "flat", "fleet", "float", "flock", "floor", "fluid",
    "flute", "foam", "focus", "fog", "foil", "folk", "food", "foot",
    "force", "fork", "fort", "fox", "frame", "fresh", "frog", "front",
    "frost", "fruit", "fuel", "fun", "funny", "fury", "game", "gap",
    "gas", "gate", "gauge", "gear", "gem", "genre", "giant", "gift",
    "girl", "give", "glad", "glass", "glide", "globe", "glory", "glove",
    "glow", "glue", "goat", "gold", "golf", "good", "goose", "gown",
    "grace", "grain", "grant", "grape", "grass", "great", "green", "grid",
    "grit", "group", "grow", "grunt", "guard", "guess", "guide", "gull",
    "gym", "habit", "hair", "half", "hall", "hand", "happy", "hard",
    "hat", "haven", "hawk", "hazel", "head", "heart", "heavy", "hedge",
    "hello", "help", "hen", "herb", "hero", "high", "hill", "hint",
    "hip", "hire", "hobby", "hold", "hole", "home", "honey", "hood",
    "hope", "horn", "horse", "host", "hotel", "hour", "hover", "hub",
    "huge", "human", "humor", "hunt", "hurry", "ice", "icon", "idea",
    "idle", "igloo", "image", "inch", "index", "inner", "input", "iron",
    "ivory", "jar", "jazz", "jeans", "jelly", "jewel", "job", "join",
    "joke", "joy", "judge", "juice", "july", "jump", "jury", "just",
    "kayak", "keen", "keep", "key", "kick", "kid", "kind", "king",
    "kiss", "kit", "kite", "kiwi", "knee", "knife", "knock", "know",
    "label", "lady", "lake", "lamp", "large", "later", "laugh", "lava",
    "lawn", "layer", "lazy", "leaf", "learn", "left", "legal", "lemon",
    "lens", "level", "lift", "light", "lilac", "lily", "limb", "limit",
    "linen", "lion", "list", "live", "loan", "local", "lock", "logic",
    "long", "loop", "loud", "love", "loyal", "lucky", "lunar", "lunch",
    "magic", "maid", "mail", "main", "major", "maple", "march", "mask",
    "mass", "match", "medal", "media", "melt", "menu", "mercy", "merit",
    "mesh", "metal", "milk", "mimic", "mind", "mint", "mist", "mix",
    "model", "month", "moon", "moral", "motor", "mouse", "move", "movie",
    "much", "mule", "music", "myth", "nail", "name", "near", "neck",
    "neon", "nerve", "nest", "net", "never", "news", "next", "nice",
    "night", "noble", "noise", "north", "nose", "note", "novel", "nurse",
    "nut", "oak", "oasis", "obey", "ocean", "odor", "offer", "often",
    "olive", "omega", "onion", "open", "opera", "orbit", "order", "organ",
    "other", "otter", "oval", "oven", "owl", "owner", "ozone", "page",
    "pair", "palm", "panda", "panel", "paper", "park", "party", "pass",
    "patch", "path", "pause", "peace", "peach", "pear", "pen", "pet",
    "phone", "photo", "piano", "piece", "pig", "pilot", "pink", "pipe",
    "pitch", "pizza", "place", "plate", "play", "pluck", "plum", "poem",
    "poet", "point", "polar", "pole", "pony", "pool", "power", "price",
    "pride", "print", "prize", "proof", "proud", "pulse", "punch", "pupil",
    "puppy", "purse", "quick", "quiet", "quilt", "quit", "quiz", "quote",
    "race", "rack", "radar", "radio", "rail", "rain", "raise", "rally",
    "ramp", "ranch", "range", "rapid", "rare", "raven", "razor", "ready",
    "real", "rebel", "relax", "renew", "rent", "rib", "rice", "rich",
    "ride", "ridge", "right", "rigid", "ring", "risk", "rival", "river",
    "road", "roast", "robot", "roof", "room", "rose", "rough", "round",
    "route", "royal", "rug", "rule", "run", "rural", "sail", "salad",
    "salon", "salt", "same", "sand", "sauce", "save", "say", "scale",
    "scan", "scene", "scout", "scrap", "scrub", "sea", "seat", "seed",
    "seek", "sell", "sense", "setup", "seven", "shaft", "share", "shed",
    "shell", "shift", "shine", "ship", "shock", "shoe", "shoot", "shop",
    "short", "shove", "shrug", "sight", "sign", "silk", "silly", "since",
    "sing", "siren", "six", "size", "skate", "ski", "skill", "skin",
    "skirt", "slab", "slam", "sleep", "slice", "slide", "slim", "slot",
    "slow", "slush", "small", "smart", "smile", "smoke", "snack", "snake",
    "snap", "sniff", "snow", "soap", "sock", "soda", "soft", "solar",
    "solid", "solve", "song", "soon", "sorry", "sort", "soul", "sound",
    "soup", "south", "space", "spare", "spawn", "speak", "speed", "spell",
    "spend", "spice", "spike", "spin", "split", "spoil", "spoon", "sport",
    "spot", "spray", "spy", "staff", "stage", "stamp", "stand", "start",
    "state", "stay", "steak", "steel", "stem", "step", "stick", "still",
    "sting", "stock", "stone", "stool", "story", "stove", "stuff", "style",
    "such", "sugar", "suit", "sun", "sunny", "super", "sure", "surge",
    "swamp", "swap", "swarm", "swear", "sweet", "swift", "swim", "swing",
    "sword", "syrup", "table", "tag", "tail", "talk", "tank", "tape",
    "task", "taste", "taxi", "teach", "team", "tell", "ten", "tent",
    "term", "test", "text", "thank", "that", "theme", "then", "there",
    "they", "thing", "this", "three", "throw", "thumb", "tide", "tiger",
    "tilt", "time", "tiny", "tip", "tired", "title", "toast", "today",
    "toe", "token", "tone", "tool", "tooth", "top", "topic", "torch",
    "toss", "total", "tower", "town", "toy", "track", "trade", "train",
    "trap", "trash", "tray", "treat", "tree", "trend", "trial", "tribe",
    "trick", "trim", "trip", "truck", "true", "truly", "trust", "truth",
    "try", "tube", "tuna", "turn", "twice", "twin", "twist", "two",
    "type", "uncle", "under", "undo", "unit", "until", "upon", "upper",
    "upset", "urban", "urge", "usage", "use", "used", "usual", "vague",
    "valid", "valve", "van", "vapor", "vast", "vault", "venue", "verb",
    "very", "video", "view", "virus", "visa", "visit", "vital", "vivid",
    "vocal", "voice", "void", "vote", "wage", "wagon", "wait", "walk",
    "wall", "want", "warm", "wash", "wasp", "waste", "water", "wave",
    "way", "wear", "web", "weird", "west", "wet", "whale", "what",
    "wheat", "wheel", "when", "where", "whip", "wide", "width", "wife",
    "wild", "will", "win", "wine", "wing", "wink", "wire", "wise",
    "wish", "wolf", "woman", "wood", "wool", "word", "work", "world",
    "worry", "worth", "wrap", "wreck", "wrist", "write", "wrong", "yard",
    "year", "you", "young", "youth", "zebra", "zero", "zone", "zoo",
];
